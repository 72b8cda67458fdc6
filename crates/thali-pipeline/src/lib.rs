//! Thali Pipeline
//!
//! The consolidation entry point: takes a batch of raw field observations
//! and runs the full pass - normalization, candidate assembly, validation,
//! blocking, similarity scoring, clustering and merge - returning canonical
//! restaurants, the provenance trail, per-record validation results, and
//! the rejected-observation ledger.
//!
//! The pass is deterministic for a fixed input batch: every ordering
//! decision ends on a total sort key, so repeated runs against a gold set
//! produce identical artifacts.

#![warn(clippy::all)]

pub mod config;
pub mod consolidator;
pub mod error;
pub mod output;

pub use config::PipelineConfig;
pub use consolidator::Consolidator;
pub use error::PipelineError;
pub use output::ConsolidationOutput;
