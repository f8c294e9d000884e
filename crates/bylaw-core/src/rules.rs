//! # Rule Sets
//!
//! Numeric limits and clause citations that a project is evaluated against.
//!
//! The serialized shape is the one the knowledge service is asked to reply
//! with and the one an override file on disk uses:
//!
//! ```json
//! {
//!   "height_max": 12, "height_clause": "BBMP 2019, Clause 4.3.2",
//!   "setback": {"front": 7, "rear": 3, "side": 3,
//!               "front_clause": "Clause 5.1.1", "rear_clause": "Clause 5.1.2",
//!               "side_clause": "Clause 5.1.3"},
//!   "parking_min": 15, "parking_clause": "Clause 6.2.1",
//!   "far_max": 1.25, "far_clause": "Table 5.4.1"
//! }
//! ```
//!
//! Every numeric limit is required; deserialization rejects a payload that
//! omits one, so a parsed rule set is never half-filled. Limits may arrive as
//! numbers or numeric strings. Clauses are optional and default to `null`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BylawError;

/// Resolved regulatory limits for one compliance request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Maximum building height (m).
    #[serde(deserialize_with = "lenient::limit")]
    pub height_max: f64,
    /// Citation for the height limit.
    #[serde(default, deserialize_with = "lenient::text")]
    pub height_clause: Option<String>,
    /// Minimum setbacks.
    pub setback: SetbackRules,
    /// Minimum parking spots.
    #[serde(deserialize_with = "lenient::limit")]
    pub parking_min: f64,
    /// Citation for the parking minimum.
    #[serde(default, deserialize_with = "lenient::text")]
    pub parking_clause: Option<String>,
    /// Maximum floor area ratio.
    #[serde(deserialize_with = "lenient::limit")]
    pub far_max: f64,
    /// Citation for the FAR limit.
    #[serde(default, deserialize_with = "lenient::text")]
    pub far_clause: Option<String>,
}

/// Minimum front/rear/side setbacks and their citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetbackRules {
    /// Minimum front setback (m).
    #[serde(deserialize_with = "lenient::limit")]
    pub front: f64,
    /// Minimum rear setback (m).
    #[serde(deserialize_with = "lenient::limit")]
    pub rear: f64,
    /// Minimum side setback (m).
    #[serde(deserialize_with = "lenient::limit")]
    pub side: f64,
    /// Citation for the front setback.
    #[serde(default, deserialize_with = "lenient::text")]
    pub front_clause: Option<String>,
    /// Citation for the rear setback.
    #[serde(default, deserialize_with = "lenient::text")]
    pub rear_clause: Option<String>,
    /// Citation for the side setback.
    #[serde(default, deserialize_with = "lenient::text")]
    pub side_clause: Option<String>,
}

impl RuleSet {
    /// The built-in BBMP 2019 limits used when nothing better is available.
    pub fn builtin() -> Self {
        Self {
            height_max: 12.0,
            height_clause: Some("BBMP 2019, Clause 4.3.2".to_string()),
            setback: SetbackRules {
                front: 7.0,
                rear: 3.0,
                side: 3.0,
                front_clause: Some("Clause 5.1.1".to_string()),
                rear_clause: Some("Clause 5.1.2".to_string()),
                side_clause: Some("Clause 5.1.3".to_string()),
            },
            parking_min: 15.0,
            parking_clause: Some("Clause 6.2.1".to_string()),
            far_max: 1.25,
            far_clause: Some("Table 5.4.1".to_string()),
        }
    }

    /// Parse a rule set from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`BylawError::Json`] if a limit is missing or not a
    /// non-negative number.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, BylawError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read a rule set from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`BylawError::RulesLoad`] if the file cannot be read or does
    /// not contain a complete rule set.
    pub fn from_file(path: &Path) -> Result<Self, BylawError> {
        let load_error = |reason: String| BylawError::RulesLoad {
            path: path.display().to_string(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| load_error(e.to_string()))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

pub(crate) mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn limit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let number = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| D::Error::custom(format!("expected a non-negative limit, got {value}")))
    }

    pub(crate) fn text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}
