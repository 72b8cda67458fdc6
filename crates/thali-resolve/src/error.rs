//! Resolver error types

use thali_domain::ObservationId;
use thiserror::Error;

/// Errors that can occur during entity resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A merged value references an observation the caller did not supply
    #[error("unknown observation id: {0}")]
    UnknownObservation(ObservationId),
}
