//! Duplicate clustering and field-level merge
//!
//! Matches form an undirected graph; connected components become duplicate
//! clusters (transitive closure deliberately favors recall: A-B and B-C
//! cluster all three even when A-C alone scores below threshold). Each
//! cluster merges into one canonical restaurant. Per field the
//! highest-confidence value wins, ties broken by recency, then configured
//! source priority, then content hash, so the result is deterministic for
//! any input permutation.

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use thali_domain::{
    CandidateRecord, CanonicalRestaurant, Cuisine, DuplicateCluster, FieldKind, FieldObservation,
    FieldValue, NormalizedValue, ObservationId, PairEvidence, ProvenanceRecord,
    RestaurantMetadata,
};
use tracing::debug;

/// Known city tokens for deterministic restaurant_id derivation, with
/// historical aliases folded onto one slug
const CITY_SLUGS: &[(&str, &str)] = &[
    ("bengaluru", "bengaluru"),
    ("bangalore", "bengaluru"),
    ("mumbai", "mumbai"),
    ("bombay", "mumbai"),
    ("delhi", "delhi"),
    ("chennai", "chennai"),
    ("madras", "chennai"),
    ("hyderabad", "hyderabad"),
    ("kolkata", "kolkata"),
    ("calcutta", "kolkata"),
    ("pune", "pune"),
    ("ahmedabad", "ahmedabad"),
    ("jaipur", "jaipur"),
    ("lucknow", "lucknow"),
];

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Group entity_refs into duplicate clusters given the accepted match
/// edges
///
/// Every ref lands in exactly one cluster; refs without any edge become
/// singletons. Clusters come back sorted by their smallest member, so the
/// output is independent of edge order.
pub fn cluster(refs: &[String], edges: &[PairEvidence]) -> Vec<DuplicateCluster> {
    let index: BTreeMap<&str, usize> = refs
        .iter()
        .enumerate()
        .map(|(i, r)| (r.as_str(), i))
        .collect();

    let mut uf = UnionFind::new(refs.len());
    for edge in edges {
        if let (Some(&a), Some(&b)) = (index.get(edge.left.as_str()), index.get(edge.right.as_str()))
        {
            uf.union(a, b);
        }
    }

    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (i, r) in refs.iter().enumerate() {
        groups.entry(uf.find(i)).or_default().push(r.clone());
    }

    let mut clusters: Vec<DuplicateCluster> = groups
        .into_values()
        .map(|members| {
            let member_set: BTreeSet<&str> = members.iter().map(|m| m.as_str()).collect();
            let evidence = edges
                .iter()
                .filter(|e| member_set.contains(e.left.as_str()))
                .cloned()
                .collect();
            DuplicateCluster::new(members, evidence)
        })
        .collect();

    clusters.sort_by(|a, b| a.members.cmp(&b.members));
    clusters
}

/// The artifacts produced by merging one duplicate cluster
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The canonical restaurant (quality score filled in by a later
    /// validation pass)
    pub restaurant: CanonicalRestaurant,

    /// One audit entry per (field, contributing observation), losers
    /// included
    pub provenance: Vec<ProvenanceRecord>,

    /// The merged candidate view, for re-validation of the canonical record
    pub merged: CandidateRecord,
}

/// Merges duplicate clusters into canonical restaurants
pub struct MergeResolver {
    config: ResolverConfig,
}

impl MergeResolver {
    /// Create a new MergeResolver with the given configuration
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Merge one cluster's member records into a canonical restaurant
    ///
    /// `records` are the cluster members; `observations` maps every
    /// contributing value back to its raw observation for the provenance
    /// trail.
    pub fn merge_cluster(
        &self,
        cluster: &DuplicateCluster,
        records: &[&CandidateRecord],
        observations: &BTreeMap<ObservationId, FieldObservation>,
        restaurant_id: &str,
    ) -> Result<MergeOutcome, ResolveError> {
        let mut merged = CandidateRecord::new(cluster.members.join("+"));
        for record in records {
            for value in record.all_values() {
                merged.push_value(value.clone());
            }
            // Normalization warnings belong to the canonical record too;
            // re-validation starts from them
            for issue in &record.issues {
                if !merged.issues.contains(issue) {
                    merged.issues.push(issue.clone());
                }
            }
        }

        let mut provenance = Vec::new();
        let mut soft_conflicts = Vec::new();
        let mut restaurant = CanonicalRestaurant {
            restaurant_id: restaurant_id.to_string(),
            canonical_name: None,
            address_full: None,
            pincode: None,
            lat: None,
            lon: None,
            phone: None,
            website: None,
            cuisines: Vec::new(),
            hours: None,
            metadata: RestaurantMetadata {
                created_at: merged.earliest_extracted_at().unwrap_or_else(Utc::now),
                updated_at: merged.latest_extracted_at().unwrap_or_else(Utc::now),
                source: merged.source_kinds(),
                quality_score: 0.0,
                soft_conflicts: Vec::new(),
            },
        };

        for field in FieldKind::ALL {
            let mut values: Vec<&NormalizedValue> = merged.values(field).iter().collect();
            if values.is_empty() {
                continue;
            }
            values.sort_by(|a, b| self.rank(a, b));

            if let Some(conflict) = self.equal_confidence_conflict(field, &values) {
                soft_conflicts.push(conflict);
            }

            let winner_value = if field == FieldKind::Cuisines {
                FieldValue::Cuisines(cuisine_union(&values))
            } else {
                values[0].value.clone()
            };
            self.apply_field(&mut restaurant, field, &winner_value);

            let winner_json = winner_value.boundary_value();
            for (seq, value) in values.iter().enumerate() {
                let observation = observations
                    .get(&value.observation)
                    .ok_or(ResolveError::UnknownObservation(value.observation))?;
                let value_json = value.value.boundary_value();
                // Union semantics: every cuisine contributor is part of the
                // canonical set
                let selected = field == FieldKind::Cuisines || value_json == winner_json;
                provenance.push(ProvenanceRecord {
                    provenance_id: format!("{}:{}:{}", restaurant_id, field, seq),
                    restaurant_id: restaurant_id.to_string(),
                    field,
                    value: value_json,
                    confidence: value.confidence,
                    source_url: observation.source_url.clone(),
                    content_hash: value.content_hash.clone(),
                    extraction_method: value.source_kind,
                    model_name: observation.model_name.clone(),
                    model_version: observation.model_version.clone(),
                    extracted_at: value.extracted_at,
                    selected,
                });
            }
        }

        restaurant.metadata.soft_conflicts = soft_conflicts;

        debug!(
            restaurant_id,
            members = cluster.len(),
            provenance = provenance.len(),
            "cluster merged"
        );

        Ok(MergeOutcome {
            restaurant,
            provenance,
            merged,
        })
    }

    /// Merge-preference ordering under the configured source priority
    fn rank(&self, a: &NormalizedValue, b: &NormalizedValue) -> Ordering {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.extracted_at.cmp(&a.extracted_at))
            .then_with(|| {
                self.config
                    .priority(b.source_kind)
                    .cmp(&self.config.priority(a.source_kind))
            })
            .then_with(|| a.content_hash.cmp(&b.content_hash))
    }

    /// A soft conflict is an equal-confidence disagreement at the top of the
    /// rank order; the tie-break chain still picks deterministically but the
    /// disagreement is worth auditing
    fn equal_confidence_conflict(
        &self,
        field: FieldKind,
        ranked: &[&NormalizedValue],
    ) -> Option<String> {
        let winner = ranked.first()?;
        let runner_up = ranked.get(1)?;
        if (winner.confidence - runner_up.confidence).abs() < f64::EPSILON
            && winner.value != runner_up.value
        {
            Some(format!(
                "{}: equal-confidence disagreement resolved by tie-break",
                field
            ))
        } else {
            None
        }
    }

    fn apply_field(
        &self,
        restaurant: &mut CanonicalRestaurant,
        field: FieldKind,
        value: &FieldValue,
    ) {
        match (field, value) {
            (FieldKind::Name, FieldValue::Name(s)) => restaurant.canonical_name = Some(s.clone()),
            (FieldKind::Address, FieldValue::Address(s)) => {
                restaurant.address_full = Some(s.clone())
            }
            (FieldKind::Pincode, FieldValue::Pincode(s)) => restaurant.pincode = Some(s.clone()),
            (FieldKind::Coordinates, FieldValue::Coordinates { lat, lon }) => {
                restaurant.lat = Some(*lat);
                restaurant.lon = Some(*lon);
            }
            (FieldKind::Phone, FieldValue::Phone(s)) => restaurant.phone = Some(s.clone()),
            (FieldKind::Website, FieldValue::Website(s)) => restaurant.website = Some(s.clone()),
            (FieldKind::Cuisines, FieldValue::Cuisines(set)) => {
                restaurant.cuisines = set.iter().copied().collect()
            }
            (FieldKind::Hours, FieldValue::Hours(hours)) => restaurant.hours = Some(hours.clone()),
            _ => {}
        }
    }
}

fn cuisine_union(values: &[&NormalizedValue]) -> BTreeSet<Cuisine> {
    let mut union = BTreeSet::new();
    for value in values {
        if let FieldValue::Cuisines(set) = &value.value {
            union.extend(set.iter().copied());
        }
    }
    union
}

/// Derive the city slug for a restaurant_id from an address, falling back
/// to "unknown" when no known city token appears
pub fn city_slug(address: Option<&str>) -> String {
    if let Some(address) = address {
        let lower = address.to_lowercase();
        for token in lower.split(|c: char| !c.is_alphanumeric()) {
            if let Some((_, slug)) = CITY_SLUGS.iter().find(|(alias, _)| *alias == token) {
                return (*slug).to_string();
            }
        }
    }
    "unknown".to_string()
}
