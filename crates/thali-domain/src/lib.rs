//! Thali Domain Layer
//!
//! This crate contains the data model for the consolidation core: raw field
//! observations arriving from upstream collectors, normalized typed values,
//! provisional candidate records, duplicate clusters, and the canonical
//! restaurant records with their provenance trail.
//!
//! ## Key Concepts
//!
//! - **FieldObservation**: one raw, provenance-carrying claim about one field
//!   of one candidate entity
//! - **FieldValue**: a typed, canonicalized value (one variant per field kind)
//! - **CandidateRecord**: a provisional entity view assembled per `entity_ref`
//! - **DuplicateCluster**: records believed to denote the same restaurant
//! - **CanonicalRestaurant**: the merged, exported entity
//! - **ProvenanceRecord**: audit link from an emitted value back to its
//!   raw observation
//!
//! Everything here is a value type; the processing crates own the transforms.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cluster;
pub mod hours;
pub mod issue;
pub mod observation;
pub mod provenance;
pub mod record;
pub mod report;
pub mod restaurant;
pub mod value;

// Re-exports for convenience
pub use cluster::{DuplicateCluster, PairEvidence};
pub use hours::{HoursSegment, TimeOfDay, Weekday, WeeklyHours};
pub use issue::{Severity, ValidationIssue};
pub use observation::{FieldKind, FieldObservation, ObservationId, SourceKind};
pub use provenance::{ProvenanceRecord, RejectedObservation};
pub use record::{CandidateRecord, NormalizedValue};
pub use report::ValidationResult;
pub use restaurant::{CanonicalRestaurant, RestaurantMetadata};
pub use value::{Cuisine, FieldValue};
