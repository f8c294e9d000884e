#![deny(missing_docs)]

//! # bylaw-core -- Foundational Types for the Bylaw Compliance Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It performs no I/O beyond reading a default-rules file on request and
//! has no internal crate dependencies; only `serde`, `serde_json` and
//! `thiserror` from the external ecosystem.
//!
//! ## Pipeline
//!
//! ```text
//! raw row ──normalize()──▶ ProjectRecord ──evaluate(&RuleSet)──▶ ComplianceReport
//! ```
//!
//! ## Design Principles
//!
//! 1. **Normalization never fails.** Unknown, empty or unparsable values
//!    coerce to zero / empty string. Required-field validation is a separate,
//!    explicit step ([`ProjectRecord::validate`]).
//!
//! 2. **Evaluation is pure.** [`evaluate`] takes a record and a rule set and
//!    returns a report. Same inputs, same report.
//!
//! 3. **Summary counts are derived.** [`ComplianceReport`] computes its
//!    summary from its checks at construction; the two cannot diverge.

pub mod answer;
pub mod error;
pub mod evaluate;
pub mod normalize;
pub mod record;
pub mod rules;

pub use answer::BylawAnswer;
pub use error::BylawError;
pub use evaluate::{
    derive_filename, evaluate, ClauseRef, ComplianceCheck, ComplianceReport, Limit, Metric,
    Observed, SetbackClauses, SetbackValues, Summary,
};
pub use normalize::{normalize, raw_row_from_json, RawRow};
pub use record::ProjectRecord;
pub use rules::{RuleSet, SetbackRules};
