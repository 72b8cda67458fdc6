//! Thali Resolver
//!
//! Entity resolution for validated candidate records: blocking narrows the
//! O(n^2) pair space, the similarity scorer decides which pairs denote the
//! same restaurant, connected components group matches into duplicate
//! clusters, and the merge resolver collapses each cluster into one
//! canonical restaurant with a full provenance trail.

#![warn(clippy::all)]

pub mod blocking;
pub mod config;
pub mod error;
pub mod merge;
pub mod similarity;

pub use blocking::BlockingIndex;
pub use config::ResolverConfig;
pub use error::ResolveError;
pub use merge::{city_slug, cluster, MergeOutcome, MergeResolver};
pub use similarity::{MatchSignal, Scorer, SimilarityResult};
