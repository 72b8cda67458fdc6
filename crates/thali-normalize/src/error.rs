//! Normalizer error types

use thali_domain::FieldKind;
use thiserror::Error;

/// Errors that can occur while canonicalizing a raw value
///
/// A normalization error excludes the observation from its field; it never
/// fails the whole record or batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// The value cannot be made into an Indian phone number
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    /// The value cannot be made into a website URL
    #[error("invalid website url: {0}")]
    InvalidWebsite(String),

    /// The value is not a usable coordinate pair
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// The raw JSON payload has the wrong shape for the field
    #[error("unexpected {field} payload: {detail}")]
    UnexpectedShape {
        /// The field being normalized
        field: FieldKind,
        /// What was wrong with the payload
        detail: String,
    },
}
