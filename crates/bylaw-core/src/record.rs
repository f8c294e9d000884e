//! # Canonical Project Record
//!
//! The one shape every downstream component sees. Field names serialize to
//! the canonical tabular column names, so a serialized record fed back
//! through [`crate::normalize`] yields the same record.

use serde::{Deserialize, Serialize};

use crate::error::BylawError;

/// A single building project, as submitted for a compliance check.
///
/// Areas are square metres, lengths are metres. Numeric fields are never
/// negative; missing values are zero and missing text is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Project name.
    #[serde(rename = "project_name")]
    pub name: String,
    /// Plot area in square metres.
    #[serde(rename = "plot_area_sqm")]
    pub plot_area: f64,
    /// Built-up area in square metres.
    #[serde(rename = "built_area_sqm")]
    pub built_area: f64,
    /// Building height in metres.
    #[serde(rename = "height_m")]
    pub height: f64,
    /// Number of floors.
    pub floors: u32,
    /// Front setback in metres.
    #[serde(rename = "front_setback_m")]
    pub front_setback: f64,
    /// Rear setback in metres.
    #[serde(rename = "rear_setback_m")]
    pub rear_setback: f64,
    /// Side setback in metres.
    #[serde(rename = "side_setback_m")]
    pub side_setback: f64,
    /// Number of parking spots provided.
    pub parking_spots: u32,
    /// Building type (residential, commercial, ...).
    pub building_type: String,
    /// Free-text location.
    pub location: String,
    /// Floor area ratio utilized.
    pub far_utilized: f64,
}

impl ProjectRecord {
    /// Check the fields a compliance query cannot be built without.
    ///
    /// # Errors
    ///
    /// Returns [`BylawError::InvalidInput`] naming every blank field among
    /// `project_name`, `building_type` and `location`.
    pub fn validate(&self) -> Result<(), BylawError> {
        let missing: Vec<&str> = [
            ("project_name", &self.name),
            ("building_type", &self.building_type),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BylawError::InvalidInput(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}
