//! Per-restaurant validation artifact emitted at the output boundary

use crate::issue::ValidationIssue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validation outcome for one canonical restaurant
///
/// `field_validations` maps each populated field to whether it passed its
/// rules; `completeness` maps each expected field to whether it is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The restaurant this result describes
    pub restaurant_id: String,

    /// False when any fatal rule fired
    pub is_valid: bool,

    /// Quality score in [0, 1]
    pub quality_score: f64,

    /// Per-field rule outcome (true = passed)
    pub field_validations: BTreeMap<String, bool>,

    /// All issues found, fatal first
    pub overall_issues: Vec<ValidationIssue>,

    /// Per-field population (true = populated)
    pub completeness: BTreeMap<String, bool>,
}
