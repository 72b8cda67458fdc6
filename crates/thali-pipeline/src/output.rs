//! Consolidation output artifacts

use serde::{Deserialize, Serialize};
use thali_domain::{
    CanonicalRestaurant, ProvenanceRecord, RejectedObservation, ValidationResult,
};

/// Everything a consolidation pass produces for one input batch
///
/// Handed to the export/eval collaborators as one value; partial batches
/// are never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationOutput {
    /// Canonical restaurants, one per duplicate cluster
    pub restaurants: Vec<CanonicalRestaurant>,

    /// The full provenance trail, winners and losers
    pub provenance: Vec<ProvenanceRecord>,

    /// Per-restaurant validation results, invalid records included
    pub validations: Vec<ValidationResult>,

    /// Observations that could not contribute a value, with reasons
    pub rejected: Vec<RejectedObservation>,

    /// entity_refs that could not be clustered automatically (no name and
    /// no coordinates)
    pub needs_manual_review: Vec<String>,
}

impl ConsolidationOutput {
    /// Look up a restaurant by id
    pub fn restaurant(&self, restaurant_id: &str) -> Option<&CanonicalRestaurant> {
        self.restaurants
            .iter()
            .find(|r| r.restaurant_id == restaurant_id)
    }

    /// Look up a validation result by restaurant id
    pub fn validation(&self, restaurant_id: &str) -> Option<&ValidationResult> {
        self.validations
            .iter()
            .find(|v| v.restaurant_id == restaurant_id)
    }

    /// Provenance entries for one restaurant
    pub fn provenance_for<'a>(
        &'a self,
        restaurant_id: &'a str,
    ) -> impl Iterator<Item = &'a ProvenanceRecord> + 'a {
        self.provenance
            .iter()
            .filter(move |p| p.restaurant_id == restaurant_id)
    }
}
