//! Pipeline error types

use thali_resolve::ResolveError;
use thiserror::Error;

/// Errors that abort a consolidation batch
///
/// Bad records never abort a batch; they degrade to low scores, rejection
/// entries or manual-review flags. Only configuration and internal
/// bookkeeping failures surface here.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Entity resolution failed
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),
}
