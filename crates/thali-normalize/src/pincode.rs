//! Pincode normalization (6-digit Indian postal codes)

use crate::Normalized;
use thali_domain::{FieldKind, FieldValue, ValidationIssue};
use tracing::debug;

/// Normalize a pincode to exactly 6 digits
///
/// A malformed pincode is a soft failure: the outcome carries no value and an
/// `invalid_pincode` issue, so downstream validation can flag the record
/// without failing it.
pub fn normalize_pincode(raw: &str) -> Normalized {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 6 {
        return Normalized {
            value: Some(FieldValue::Pincode(digits)),
            issues: Vec::new(),
        };
    }

    debug!(raw, "pincode did not normalize to 6 digits");
    Normalized {
        value: None,
        issues: vec![ValidationIssue::warning(
            "invalid_pincode",
            format!("pincode {:?} does not reduce to 6 digits", raw.trim()),
        )
        .with_field(FieldKind::Pincode)],
    }
}
