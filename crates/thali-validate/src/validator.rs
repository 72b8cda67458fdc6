//! Candidate record validation and quality scoring

use crate::config::ValidationConfig;
use crate::error::ValidateError;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use thali_domain::{CandidateRecord, FieldKind, Severity, ValidationIssue};
use tracing::debug;

/// Approximate postal zones keyed by the pincode's first digit:
/// (digit, lat_min, lat_max, lon_min, lon_max). Boxes are deliberately
/// generous; the check is a weak consistency signal, not a geocoder.
const PINCODE_ZONES: [(u8, f64, f64, f64, f64); 8] = [
    (b'1', 26.0, 37.5, 70.0, 81.0), // Delhi, Haryana, Punjab, HP, J&K
    (b'2', 23.5, 31.5, 77.0, 84.5), // UP, Uttarakhand
    (b'3', 19.5, 30.5, 68.0, 78.5), // Rajasthan, Gujarat
    (b'4', 14.5, 23.5, 72.0, 82.5), // Maharashtra, MP, Goa
    (b'5', 11.5, 20.5, 73.5, 85.0), // AP, Telangana, Karnataka
    (b'6', 8.0, 14.5, 74.0, 81.0),  // Tamil Nadu, Kerala
    (b'7', 17.0, 29.5, 83.5, 98.0), // WB, Odisha, North-East
    (b'8', 20.5, 31.0, 83.0, 89.0), // Bihar, Jharkhand
];

/// Result of validating one candidate record
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// False when any fatal rule fired
    pub is_valid: bool,

    /// Quality score in [0, 1]
    pub quality_score: f64,

    /// All issues, fatal first (normalization issues carried through)
    pub issues: Vec<ValidationIssue>,

    /// Per populated field: whether its rules passed
    pub field_validations: BTreeMap<String, bool>,

    /// Per expected field: whether it is populated
    pub completeness: BTreeMap<String, bool>,
}

/// The Validator checks candidate records against the configured rules
/// and computes their quality score
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new Validator, rejecting an inconsistent configuration
    pub fn new(config: ValidationConfig) -> Result<Self, ValidateError> {
        config.validate().map_err(ValidateError::Config)?;
        Ok(Self { config })
    }

    /// Create a Validator with default configuration
    pub fn default_config() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Validate a record and compute its quality score
    ///
    /// `now` is passed in rather than read from the clock so runs are
    /// repeatable.
    pub fn validate(&self, record: &CandidateRecord, now: DateTime<Utc>) -> ValidationReport {
        let mut issues = record.issues.clone();

        // Required-field rules
        if record.name().is_none() {
            issues.push(ValidationIssue::fatal("missing_name", "record has no name"));
        }
        if record.coordinates().is_none() && record.address().is_none() {
            issues.push(ValidationIssue::fatal(
                "no_location_signal",
                "record has neither coordinates nor an address",
            ));
        }

        // Range rules
        if let Some((lat, lon)) = record.coordinates() {
            if !self.in_bounds(lat, lon) {
                issues.push(
                    ValidationIssue::fatal(
                        "coordinates_out_of_bounds",
                        format!("({}, {}) is outside the India bounding box", lat, lon),
                    )
                    .with_field(FieldKind::Coordinates),
                );
            }
        }
        if let Some(phone) = record.phone() {
            if !is_india_mobile(phone) {
                issues.push(
                    ValidationIssue::warning(
                        "phone_format",
                        format!("phone {:?} is not a +91 mobile number", phone),
                    )
                    .with_field(FieldKind::Phone),
                );
            }
        }

        // Consistency rules
        if let Some(pincode) = record.pincode() {
            if !pincode.as_bytes().first().is_some_and(|d| (b'1'..=b'8').contains(d)) {
                issues.push(
                    ValidationIssue::warning(
                        "pincode_format",
                        "pincode first digit must be 1-8 for India",
                    )
                    .with_field(FieldKind::Pincode),
                );
            } else if self.config.check_pincode_region {
                if let Some((lat, lon)) = record.coordinates() {
                    if !zone_matches(pincode.as_bytes()[0], lat, lon) {
                        issues.push(
                            ValidationIssue::warning(
                                "pincode_region_mismatch",
                                format!(
                                    "pincode {} zone does not cover ({}, {})",
                                    pincode, lat, lon
                                ),
                            )
                            .with_field(FieldKind::Pincode),
                        );
                    }
                }
            }
        }
        if let Some(hours) = record.hours() {
            if hours.open_days().any(|(_, segments)| {
                segments.iter().any(|segment| !segment.is_valid())
            }) {
                issues.push(
                    ValidationIssue::warning("invalid_hours", "hours contain an invalid segment")
                        .with_field(FieldKind::Hours),
                );
            }
        }

        // Freshness rule
        if let Some(latest) = record.latest_extracted_at() {
            if latest < now - Duration::days(self.config.staleness_days) {
                issues.push(ValidationIssue::warning(
                    "stale_record",
                    format!(
                        "all observations are older than {} days",
                        self.config.staleness_days
                    ),
                ));
            }
        }

        // Fatal first, stable within each severity
        issues.sort_by_key(|issue| issue.severity);

        let quality_score = self.score(record, &issues);
        let is_valid = !issues.iter().any(ValidationIssue::is_fatal);

        if !is_valid {
            debug!(
                entity_ref = %record.entity_ref,
                issues = issues.len(),
                "record failed validation"
            );
        }

        ValidationReport {
            is_valid,
            quality_score,
            field_validations: field_validations(record, &issues),
            completeness: completeness(record),
            issues,
        }
    }

    fn in_bounds(&self, lat: f64, lon: f64) -> bool {
        (self.config.lat_min..=self.config.lat_max).contains(&lat)
            && (self.config.lon_min..=self.config.lon_max).contains(&lon)
    }

    /// Weighted completeness minus issue penalties, clamped to [0, 1]
    fn score(&self, record: &CandidateRecord, issues: &[ValidationIssue]) -> f64 {
        let w = &self.config.weights;
        let mut score = 0.0;

        if record.is_populated(FieldKind::Name) {
            score += w.name;
        }
        if record.is_populated(FieldKind::Address) {
            score += w.address;
        }
        if record.is_populated(FieldKind::Phone) {
            score += w.phone;
        }
        if record.is_populated(FieldKind::Coordinates) {
            score += w.coordinates;
        }
        if record.is_populated(FieldKind::Hours) {
            score += w.hours;
        }
        if record.is_populated(FieldKind::Cuisines) {
            score += w.cuisines;
        }

        for issue in issues {
            score -= match issue.severity {
                Severity::Fatal => self.config.fatal_penalty,
                Severity::Warning => self.config.warning_penalty,
            };
        }

        score.clamp(0.0, 1.0)
    }
}

/// `+91` followed by a 10-digit mobile number starting 6-9
fn is_india_mobile(phone: &str) -> bool {
    let Some(rest) = phone.strip_prefix("+91") else {
        return false;
    };
    rest.len() == 10
        && rest.as_bytes()[0] >= b'6'
        && rest.bytes().all(|b| b.is_ascii_digit())
}

fn zone_matches(first_digit: u8, lat: f64, lon: f64) -> bool {
    PINCODE_ZONES
        .iter()
        .find(|(digit, ..)| *digit == first_digit)
        .is_some_and(|(_, lat_min, lat_max, lon_min, lon_max)| {
            (*lat_min..=*lat_max).contains(&lat) && (*lon_min..=*lon_max).contains(&lon)
        })
}

fn field_validations(
    record: &CandidateRecord,
    issues: &[ValidationIssue],
) -> BTreeMap<String, bool> {
    let mut map = BTreeMap::new();
    for field in record.populated_fields() {
        let passed = !issues.iter().any(|issue| issue.field == Some(field));
        map.insert(field.as_str().to_string(), passed);
    }
    map
}

fn completeness(record: &CandidateRecord) -> BTreeMap<String, bool> {
    FieldKind::ALL
        .iter()
        .map(|field| (field.as_str().to_string(), record.is_populated(*field)))
        .collect()
}
