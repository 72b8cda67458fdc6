//! Candidate records - provisional entity views assembled per entity_ref

use crate::hours::WeeklyHours;
use crate::issue::ValidationIssue;
use crate::observation::{FieldKind, ObservationId, SourceKind};
use crate::value::{Cuisine, FieldValue};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// A normalized value together with the envelope of the observation that
/// produced it
///
/// Normalization is a pure function of the raw value and field kind; the
/// envelope fields are carried along for merge tie-breaking and provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedValue {
    /// Internal id of the originating observation
    pub observation: ObservationId,

    /// The canonicalized value
    pub value: FieldValue,

    /// Extraction confidence of the originating observation
    pub confidence: f64,

    /// Collector kind of the originating observation
    pub source_kind: SourceKind,

    /// Extraction timestamp of the originating observation
    pub extracted_at: DateTime<Utc>,

    /// Content hash of the originating observation (final stable tie-break key)
    pub content_hash: String,
}

impl NormalizedValue {
    /// Merge-preference ordering: higher confidence first, then most recent,
    /// then default source priority, then content hash ascending.
    ///
    /// The chain ends on a total key so sorting is deterministic for any
    /// input permutation.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .confidence
            .partial_cmp(&self.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.extracted_at.cmp(&self.extracted_at))
            .then_with(|| {
                other
                    .source_kind
                    .default_priority()
                    .cmp(&self.source_kind.default_priority())
            })
            .then_with(|| self.content_hash.cmp(&other.content_hash))
    }
}

/// A provisional entity view: all normalized values sharing an entity_ref,
/// plus validation issues and a computed quality score
///
/// Mutated only during assembly and validation; once a record enters a
/// duplicate cluster it is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    /// Loose upstream entity identifier
    pub entity_ref: String,

    /// All contributing normalized values, grouped per field
    values: BTreeMap<FieldKind, Vec<NormalizedValue>>,

    /// Validation issues found for this record
    pub issues: Vec<ValidationIssue>,

    /// Quality score in [0, 1], set by the validator
    pub quality_score: f64,
}

impl CandidateRecord {
    /// Create an empty record for an entity_ref
    pub fn new(entity_ref: impl Into<String>) -> Self {
        Self {
            entity_ref: entity_ref.into(),
            values: BTreeMap::new(),
            issues: Vec::new(),
            quality_score: 0.0,
        }
    }

    /// Add a contributing normalized value
    pub fn push_value(&mut self, value: NormalizedValue) {
        self.values.entry(value.value.kind()).or_default().push(value);
    }

    /// All contributing values for a field (empty when unpopulated)
    pub fn values(&self, field: FieldKind) -> &[NormalizedValue] {
        self.values.get(&field).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Iterate over every contributing value, in field order
    pub fn all_values(&self) -> impl Iterator<Item = &NormalizedValue> {
        self.values.values().flatten()
    }

    /// Fields with at least one contributing value
    pub fn populated_fields(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| *k)
    }

    /// Whether a field has at least one contributing value
    pub fn is_populated(&self, field: FieldKind) -> bool {
        !self.values(field).is_empty()
    }

    /// The best contributing value for a field under the default
    /// merge-preference ordering
    pub fn best(&self, field: FieldKind) -> Option<&NormalizedValue> {
        self.values(field).iter().min_by(|a, b| a.rank_cmp(b))
    }

    /// Best name, if populated
    pub fn name(&self) -> Option<&str> {
        self.best(FieldKind::Name).and_then(|v| v.value.as_str())
    }

    /// Best address, if populated
    pub fn address(&self) -> Option<&str> {
        self.best(FieldKind::Address).and_then(|v| v.value.as_str())
    }

    /// Best pincode, if populated
    pub fn pincode(&self) -> Option<&str> {
        self.best(FieldKind::Pincode).and_then(|v| v.value.as_str())
    }

    /// Best phone, if populated
    pub fn phone(&self) -> Option<&str> {
        self.best(FieldKind::Phone).and_then(|v| v.value.as_str())
    }

    /// Best website, if populated
    pub fn website(&self) -> Option<&str> {
        self.best(FieldKind::Website).and_then(|v| v.value.as_str())
    }

    /// Best coordinate pair, if populated
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self.best(FieldKind::Coordinates).map(|v| &v.value) {
            Some(FieldValue::Coordinates { lat, lon }) => Some((*lat, *lon)),
            _ => None,
        }
    }

    /// Best cuisine set, if populated
    pub fn cuisines(&self) -> Option<&BTreeSet<Cuisine>> {
        match self.best(FieldKind::Cuisines).map(|v| &v.value) {
            Some(FieldValue::Cuisines(set)) => Some(set),
            _ => None,
        }
    }

    /// Best weekly hours, if populated
    pub fn hours(&self) -> Option<&WeeklyHours> {
        match self.best(FieldKind::Hours).map(|v| &v.value) {
            Some(FieldValue::Hours(hours)) => Some(hours),
            _ => None,
        }
    }

    /// Whether any fatal validation issue is attached
    pub fn has_fatal(&self) -> bool {
        self.issues.iter().any(|i| i.is_fatal())
    }

    /// The earliest extraction timestamp across contributing values
    pub fn earliest_extracted_at(&self) -> Option<DateTime<Utc>> {
        self.all_values().map(|v| v.extracted_at).min()
    }

    /// The most recent extraction timestamp across contributing values
    pub fn latest_extracted_at(&self) -> Option<DateTime<Utc>> {
        self.all_values().map(|v| v.extracted_at).max()
    }

    /// The set of source kinds that contributed values
    pub fn source_kinds(&self) -> BTreeSet<SourceKind> {
        self.all_values().map(|v| v.source_kind).collect()
    }
}
