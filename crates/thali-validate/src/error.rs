//! Validator error types

use thiserror::Error;

/// Errors that can occur setting up the validator
///
/// Validation itself never fails: bad records produce issues and low scores,
/// not errors.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
