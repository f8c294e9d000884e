//! # Compliance Evaluator
//!
//! Applies a [`RuleSet`] to a [`ProjectRecord`] and produces a
//! [`ComplianceReport`] with exactly four checks, in this order:
//!
//! | Metric  | Observed                  | Passes when          | Clause        |
//! |---------|---------------------------|----------------------|---------------|
//! | height  | `height_m`                | `value <= max`       | single        |
//! | setback | front / rear / side       | every side `>= min`  | per-side map  |
//! | parking | `parking_spots`           | `value >= min`       | single        |
//! | far     | `far_utilized`            | `value <= max`       | single        |
//!
//! Renderers key off the per-metric JSON shapes, so the setback check keeps
//! its structured value, limit and clause instead of collapsing them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::ProjectRecord;
use crate::rules::RuleSet;

/// The four evaluated metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Building height, must not exceed the maximum.
    Height,
    /// Front/rear/side setbacks, each must meet the minimum.
    Setback,
    /// Parking spots, must meet the minimum.
    Parking,
    /// Floor area ratio, must not exceed the maximum.
    Far,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Height => write!(f, "height"),
            Self::Setback => write!(f, "setback"),
            Self::Parking => write!(f, "parking"),
            Self::Far => write!(f, "far"),
        }
    }
}

/// Per-side setback figures, used for both observed values and limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetbackValues {
    /// Front setback (m).
    pub front: f64,
    /// Rear setback (m).
    pub rear: f64,
    /// Side setback (m).
    pub side: f64,
}

/// Per-side setback citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetbackClauses {
    /// Front setback citation.
    pub front: Option<String>,
    /// Rear setback citation.
    pub rear: Option<String>,
    /// Side setback citation.
    pub side: Option<String>,
}

/// The observed value of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Observed {
    /// A whole-number count (parking spots).
    Count(u32),
    /// A measurement (height, FAR).
    Measure(f64),
    /// Front/rear/side setbacks.
    Setback(SetbackValues),
}

/// The limit a metric is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    /// Observed value must not exceed `max`.
    Max {
        /// Inclusive upper bound.
        max: f64,
    },
    /// Observed value must meet or exceed `min`.
    Min {
        /// Inclusive lower bound.
        min: f64,
    },
    /// Every side must meet or exceed its minimum.
    Setback(SetbackValues),
}

/// Clause reference attached to a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClauseRef {
    /// One citation (or `null`) for a scalar metric.
    Single(Option<String>),
    /// One citation per setback side.
    PerSide(SetbackClauses),
}

/// One evaluated metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    /// Which metric this is.
    pub metric: Metric,
    /// What the project provides.
    pub value: Observed,
    /// What the bylaw requires.
    pub limit: Limit,
    /// Whether the observed value satisfies the limit.
    pub compliant: bool,
    /// Where the limit comes from.
    pub clause: ClauseRef,
}

impl ComplianceCheck {
    fn at_most(metric: Metric, value: f64, max: f64, clause: Option<String>) -> Self {
        Self {
            metric,
            value: Observed::Measure(value),
            limit: Limit::Max { max },
            compliant: value <= max,
            clause: ClauseRef::Single(clause),
        }
    }

    fn setback(observed: SetbackValues, limits: SetbackValues, clauses: SetbackClauses) -> Self {
        let compliant = observed.front >= limits.front
            && observed.rear >= limits.rear
            && observed.side >= limits.side;
        Self {
            metric: Metric::Setback,
            value: Observed::Setback(observed),
            limit: Limit::Setback(limits),
            compliant,
            clause: ClauseRef::PerSide(clauses),
        }
    }

    fn parking(spots: u32, min: f64, clause: Option<String>) -> Self {
        Self {
            metric: Metric::Parking,
            value: Observed::Count(spots),
            limit: Limit::Min { min },
            compliant: f64::from(spots) >= min,
            clause: ClauseRef::Single(clause),
        }
    }
}

/// Compliant / violation counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of compliant checks.
    pub compliant: usize,
    /// Number of failing checks.
    pub violations: usize,
}

/// The result of evaluating one project.
///
/// Fields are private: the summary is computed from the checks when the
/// report is built and neither can be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    project_name: String,
    filename: String,
    checks: [ComplianceCheck; 4],
    summary: Summary,
}

impl ComplianceReport {
    fn new(project_name: String, checks: [ComplianceCheck; 4]) -> Self {
        let compliant = checks.iter().filter(|c| c.compliant).count();
        Self {
            filename: derive_filename(&project_name),
            project_name,
            summary: Summary {
                compliant,
                violations: checks.len() - compliant,
            },
            checks,
        }
    }

    /// The project's name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// File name derived from the project name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Checks in display order: height, setback, parking, far.
    pub fn checks(&self) -> &[ComplianceCheck; 4] {
        &self.checks
    }

    /// Look up a check by metric.
    pub fn check(&self, metric: Metric) -> Option<&ComplianceCheck> {
        self.checks.iter().find(|c| c.metric == metric)
    }

    /// Compliant / violation counts.
    pub fn summary(&self) -> Summary {
        self.summary
    }
}

/// Evaluate a project record against a rule set.
pub fn evaluate(record: &ProjectRecord, rules: &RuleSet) -> ComplianceReport {
    let setback = &rules.setback;
    let checks = [
        ComplianceCheck::at_most(
            Metric::Height,
            record.height,
            rules.height_max,
            rules.height_clause.clone(),
        ),
        ComplianceCheck::setback(
            SetbackValues {
                front: record.front_setback,
                rear: record.rear_setback,
                side: record.side_setback,
            },
            SetbackValues {
                front: setback.front,
                rear: setback.rear,
                side: setback.side,
            },
            SetbackClauses {
                front: setback.front_clause.clone(),
                rear: setback.rear_clause.clone(),
                side: setback.side_clause.clone(),
            },
        ),
        ComplianceCheck::parking(
            record.parking_spots,
            rules.parking_min,
            rules.parking_clause.clone(),
        ),
        ComplianceCheck::at_most(
            Metric::Far,
            record.far_utilized,
            rules.far_max,
            rules.far_clause.clone(),
        ),
    ];
    ComplianceReport::new(record.name.clone(), checks)
}

/// Derive the report file name: each run of whitespace in the project name
/// becomes one underscore, then `.csv` is appended.
pub fn derive_filename(project_name: &str) -> String {
    let mut filename = String::with_capacity(project_name.len() + 4);
    let mut in_whitespace = false;
    for ch in project_name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                filename.push('_');
            }
            in_whitespace = true;
        } else {
            filename.push(ch);
            in_whitespace = false;
        }
    }
    filename.push_str(".csv");
    filename
}
