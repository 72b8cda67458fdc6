//! Thali Validator
//!
//! Rule-based validation and quality scoring for candidate records. Rules are
//! declarative and independent; each produces at most one issue. A record
//! with a fatal issue is excluded from entity resolution but always retained
//! and reported as invalid - nothing here aborts a batch.

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod validator;

pub use config::{CompletenessWeights, ValidationConfig};
pub use error::ValidateError;
pub use validator::{ValidationReport, Validator};
