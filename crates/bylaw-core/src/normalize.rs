//! # Record Normalizer
//!
//! Turns a loosely-typed tabular row into a [`ProjectRecord`].
//!
//! ## Key Matching
//!
//! Keys are folded before lookup: surrounding whitespace is trimmed, ASCII
//! case is lowered, and every run of interior whitespace becomes a single
//! underscore. `"Plot Area SQM"` and `"plot_area_sqm"` are the same key.
//!
//! Each canonical field owns a priority-ordered alias list. The first alias
//! that is present with a non-blank value wins. The canonical column name is
//! always the first alias, so an already-normalized record passes through
//! unchanged.
//!
//! ## Coercion
//!
//! Numeric values that are empty, unparsable, non-finite or negative coerce
//! to zero. Count fields truncate fractions. Normalization never fails.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::record::ProjectRecord;

/// A raw tabular row: column name → cell text.
pub type RawRow = BTreeMap<String, String>;

const NAME: &[&str] = &["project_name", "name", "project"];
const PLOT_AREA: &[&str] = &["plot_area_sqm", "plot_area", "site_area_sqm", "site_area"];
const BUILT_AREA: &[&str] = &[
    "built_area_sqm",
    "built_area",
    "built_up_area_sqm",
    "built_up_area",
];
const HEIGHT: &[&str] = &["height_m", "height", "building_height_m", "building_height"];
const FLOORS: &[&str] = &["floors", "floor_count", "num_floors", "storeys"];
const FRONT_SETBACK: &[&str] = &["front_setback_m", "front_setback"];
const REAR_SETBACK: &[&str] = &["rear_setback_m", "rear_setback"];
const SIDE_SETBACK: &[&str] = &["side_setback_m", "side_setback"];
const PARKING: &[&str] = &["parking_spots", "parking_spaces", "parking"];
const FAR: &[&str] = &["far_utilized", "far", "floor_area_ratio"];
const BUILDING_TYPE: &[&str] = &["building_type", "type", "use"];
const LOCATION: &[&str] = &["location", "address", "zone"];

/// Normalize a raw row into a complete [`ProjectRecord`].
pub fn normalize(raw: &RawRow) -> ProjectRecord {
    let mut folded: BTreeMap<String, &str> = BTreeMap::new();
    // Blank cells are skipped so they never shadow a filled key that folds
    // to the same name.
    for (key, value) in raw.iter().filter(|(_, v)| !v.trim().is_empty()) {
        folded.entry(fold_key(key)).or_insert(value.as_str());
    }
    let text = |aliases: &[&str]| lookup(&folded, aliases).unwrap_or_default().to_string();
    let measure = |aliases: &[&str]| lookup(&folded, aliases).map_or(0.0, parse_measure);
    let count = |aliases: &[&str]| lookup(&folded, aliases).map_or(0, parse_count);

    ProjectRecord {
        name: text(NAME),
        plot_area: measure(PLOT_AREA),
        built_area: measure(BUILT_AREA),
        height: measure(HEIGHT),
        floors: count(FLOORS),
        front_setback: measure(FRONT_SETBACK),
        rear_setback: measure(REAR_SETBACK),
        side_setback: measure(SIDE_SETBACK),
        parking_spots: count(PARKING),
        building_type: text(BUILDING_TYPE),
        location: text(LOCATION),
        far_utilized: measure(FAR),
    }
}

/// Flatten a JSON object into a [`RawRow`].
///
/// Strings are kept as-is, numbers and booleans are rendered, `null`
/// becomes an empty cell. Nested arrays and objects are not tabular and are
/// dropped.
pub fn raw_row_from_json(object: &Map<String, Value>) -> RawRow {
    object
        .iter()
        .filter_map(|(key, value)| {
            let cell = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key.clone(), cell))
        })
        .collect()
}

fn fold_key(key: &str) -> String {
    let mut folded = String::with_capacity(key.len());
    let mut in_whitespace = false;
    for ch in key.trim().chars() {
        if ch.is_whitespace() {
            in_whitespace = true;
            continue;
        }
        if in_whitespace {
            folded.push('_');
            in_whitespace = false;
        }
        folded.extend(ch.to_lowercase());
    }
    folded
}

fn lookup<'a>(folded: &BTreeMap<String, &'a str>, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| folded.get(*alias).copied())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

fn parse_measure(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => n,
        _ => 0.0,
    }
}

fn parse_count(cell: &str) -> u32 {
    // `as` saturates at u32::MAX.
    parse_measure(cell).trunc() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn canonical_row_normalizes_every_field() {
        let record = normalize(&row(&[
            ("project_name", "Green Tower 2"),
            ("plot_area_sqm", "1000"),
            ("built_area_sqm", "1200.5"),
            ("height_m", "10"),
            ("floors", "3"),
            ("front_setback_m", "8"),
            ("rear_setback_m", "4"),
            ("side_setback_m", "4"),
            ("parking_spots", "20"),
            ("building_type", "residential"),
            ("location", "Indiranagar"),
            ("far_utilized", "1.0"),
        ]));
        assert_eq!(record.name, "Green Tower 2");
        assert_eq!(record.plot_area, 1000.0);
        assert_eq!(record.built_area, 1200.5);
        assert_eq!(record.height, 10.0);
        assert_eq!(record.floors, 3);
        assert_eq!(record.front_setback, 8.0);
        assert_eq!(record.rear_setback, 4.0);
        assert_eq!(record.side_setback, 4.0);
        assert_eq!(record.parking_spots, 20);
        assert_eq!(record.building_type, "residential");
        assert_eq!(record.location, "Indiranagar");
        assert_eq!(record.far_utilized, 1.0);
    }

    #[test]
    fn aliases_resolve_in_priority_order() {
        let record = normalize(&row(&[("plot_area", "500"), ("plot_area_sqm", "750")]));
        assert_eq!(record.plot_area, 750.0);

        let record = normalize(&row(&[("site_area", "300")]));
        assert_eq!(record.plot_area, 300.0);
    }

    #[test]
    fn blank_alias_falls_through_to_next() {
        let record = normalize(&row(&[("height_m", "  "), ("height", "14")]));
        assert_eq!(record.height, 14.0);
    }

    #[test]
    fn blank_cell_does_not_shadow_same_folded_key() {
        let record = normalize(&row(&[("Height M", ""), ("height_m", "12")]));
        assert_eq!(record.height, 12.0);
    }

    #[test]
    fn keys_match_case_insensitively_with_whitespace_folded() {
        let record = normalize(&row(&[
            ("  Project Name ", "Lake View"),
            ("Front   Setback M", "6.5"),
            ("PARKING_SPOTS", "12"),
        ]));
        assert_eq!(record.name, "Lake View");
        assert_eq!(record.front_setback, 6.5);
        assert_eq!(record.parking_spots, 12);
    }

    #[test]
    fn unparsable_numbers_coerce_to_zero() {
        let record = normalize(&row(&[
            ("height_m", "tall"),
            ("floors", ""),
            ("far_utilized", "NaN"),
            ("rear_setback_m", "-3"),
            ("parking_spots", "inf"),
        ]));
        assert_eq!(record.height, 0.0);
        assert_eq!(record.floors, 0);
        assert_eq!(record.far_utilized, 0.0);
        assert_eq!(record.rear_setback, 0.0);
        assert_eq!(record.parking_spots, 0);
    }

    #[test]
    fn counts_truncate_fractions() {
        let record = normalize(&row(&[("floors", "4.9"), ("parking_spots", " 15.0 ")]));
        assert_eq!(record.floors, 4);
        assert_eq!(record.parking_spots, 15);
    }

    #[test]
    fn empty_row_yields_default_record() {
        assert_eq!(normalize(&RawRow::new()), ProjectRecord::default());
    }

    #[test]
    fn text_values_are_trimmed() {
        let record = normalize(&row(&[("building_type", "  commercial ")]));
        assert_eq!(record.building_type, "commercial");
    }

    #[test]
    fn fold_key_collapses_whitespace_runs() {
        assert_eq!(fold_key("Built  Up\tArea"), "built_up_area");
        assert_eq!(fold_key(" height_m "), "height_m");
    }

    #[test]
    fn json_object_flattens_scalars() {
        let value = serde_json::json!({
            "project_name": "Green Tower",
            "height_m": 10,
            "far_utilized": 1.25,
            "location": null,
            "approved": true,
            "tags": ["a", "b"],
        });
        let raw = raw_row_from_json(value.as_object().unwrap());
        assert_eq!(raw["project_name"], "Green Tower");
        assert_eq!(raw["height_m"], "10");
        assert_eq!(raw["far_utilized"], "1.25");
        assert_eq!(raw["location"], "");
        assert_eq!(raw["approved"], "true");
        assert!(!raw.contains_key("tags"));
    }

    #[test]
    fn serialized_record_round_trips_through_normalizer() {
        let record = ProjectRecord {
            name: "Green Tower".into(),
            plot_area: 1000.0,
            built_area: 1250.0,
            height: 11.5,
            floors: 4,
            front_setback: 7.0,
            rear_setback: 3.0,
            side_setback: 3.0,
            parking_spots: 18,
            building_type: "residential".into(),
            location: "Jayanagar".into(),
            far_utilized: 1.25,
        };
        let value = serde_json::to_value(&record).unwrap();
        let raw = raw_row_from_json(value.as_object().unwrap());
        assert_eq!(normalize(&raw), record);
    }
}
