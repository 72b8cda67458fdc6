//! Canonical restaurant records - the merged, exported entities

use crate::hours::WeeklyHours;
use crate::observation::SourceKind;
use crate::value::Cuisine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Metadata attached to a canonical restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantMetadata {
    /// When the canonical record was created (earliest contributing
    /// observation)
    pub created_at: DateTime<Utc>,

    /// When the canonical record was last updated (latest contributing
    /// observation)
    pub updated_at: DateTime<Utc>,

    /// Union of contributing source kinds
    pub source: BTreeSet<SourceKind>,

    /// Quality score in [0, 1]
    pub quality_score: f64,

    /// Audit notes for fields where equal-priority observations disagreed
    /// and the tie-break chain picked a winner deterministically
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soft_conflicts: Vec<String>,
}

/// The merged, exported representation of one real-world restaurant
///
/// One value per field (the winner of the field-level merge); every populated
/// field is backed by at least one provenance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRestaurant {
    /// Stable identifier derived from the earliest member's city plus a
    /// batch sequence number
    pub restaurant_id: String,

    /// Canonical name
    pub canonical_name: Option<String>,

    /// Full address
    pub address_full: Option<String>,

    /// 6-digit pincode
    pub pincode: Option<String>,

    /// Latitude
    pub lat: Option<f64>,

    /// Longitude
    pub lon: Option<f64>,

    /// Phone number in +91 format
    pub phone: Option<String>,

    /// Website URL
    pub website: Option<String>,

    /// Cuisine tags, sorted
    pub cuisines: Vec<Cuisine>,

    /// Weekly opening hours
    pub hours: Option<WeeklyHours>,

    /// Record metadata
    pub metadata: RestaurantMetadata,
}

impl CanonicalRestaurant {
    /// Coordinate pair, when both components are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}
