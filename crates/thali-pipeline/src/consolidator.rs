//! The consolidation pass
//!
//! Intake screens and normalizes observations, candidate records are
//! assembled per entity_ref and validated, valid records go through
//! blocking, pairwise scoring and connected-component clustering, and each
//! cluster merges into one canonical restaurant. Invalid records skip
//! resolution and pass through as singletons so nothing is silently
//! dropped.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::output::ConsolidationOutput;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use thali_domain::{
    CandidateRecord, DuplicateCluster, FieldObservation, ObservationId, PairEvidence,
    RejectedObservation, ValidationResult,
};
use thali_normalize::normalize_observation;
use thali_resolve::{city_slug, cluster, BlockingIndex, MergeResolver, ResolverConfig, Scorer};
use thali_validate::{ValidationReport, Validator};
use tracing::{debug, info};

/// Runs full consolidation passes over observation batches
pub struct Consolidator {
    validator: Validator,
    scorer: Scorer,
    resolver: MergeResolver,
    resolver_config: ResolverConfig,
}

impl Consolidator {
    /// Create a consolidator, validating the configuration up front
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            validator: Validator::new(config.validation)
                .map_err(|e| PipelineError::Config(e.to_string()))?,
            scorer: Scorer::new(config.resolver.clone()),
            resolver: MergeResolver::new(config.resolver.clone()),
            resolver_config: config.resolver,
        })
    }

    /// Consolidate one batch of observations
    ///
    /// `now` anchors the staleness rule; passing it in keeps runs against
    /// the gold set repeatable. The batch either completes fully or fails
    /// as a whole - partial clusters are never exposed.
    pub fn consolidate(
        &self,
        observations: Vec<FieldObservation>,
        now: DateTime<Utc>,
    ) -> Result<ConsolidationOutput, PipelineError> {
        let batch_size = observations.len();
        let mut rejected = Vec::new();
        let mut lookup: BTreeMap<ObservationId, FieldObservation> = BTreeMap::new();
        let mut records: BTreeMap<String, CandidateRecord> = BTreeMap::new();

        for observation in observations {
            if let Err(reason) = observation.validate() {
                rejected.push(reject(&observation, reason));
                continue;
            }

            let id = ObservationId::new();
            match normalize_observation(id, &observation) {
                Err(err) => rejected.push(reject(&observation, err.to_string())),
                Ok((value, issues)) => {
                    let record = records
                        .entry(observation.entity_ref.clone())
                        .or_insert_with(|| CandidateRecord::new(observation.entity_ref.clone()));
                    record.issues.extend(issues.iter().cloned());

                    match value {
                        Some(value) => {
                            record.push_value(value);
                            lookup.insert(id, observation);
                        }
                        None => {
                            let reason = issues
                                .first()
                                .map(|i| i.message.clone())
                                .unwrap_or_else(|| "no value produced".to_string());
                            rejected.push(reject(&observation, reason));
                        }
                    }
                }
            }
        }

        // Entities whose every observation was rejected have nothing to
        // consolidate; their observations are already in the ledger
        records.retain(|_, record| record.all_values().next().is_some());

        let mut reports: BTreeMap<String, ValidationReport> = BTreeMap::new();
        let mut needs_manual_review: BTreeSet<String> = BTreeSet::new();

        for (entity_ref, record) in records.iter_mut() {
            let report = self.validator.validate(record, now);
            record.quality_score = report.quality_score;
            if record.name().is_none() && record.coordinates().is_none() {
                needs_manual_review.insert(entity_ref.clone());
            }
            reports.insert(entity_ref.clone(), report);
        }

        let valid: Vec<&CandidateRecord> = records
            .values()
            .filter(|r| reports[&r.entity_ref].is_valid)
            .collect();
        let valid_refs: Vec<String> = valid.iter().map(|r| r.entity_ref.clone()).collect();

        let index = BlockingIndex::build(&valid, &self.resolver_config);
        needs_manual_review.extend(index.unblocked().iter().cloned());

        let mut edges: Vec<PairEvidence> = Vec::new();
        for (left, right) in index.candidate_pairs() {
            let result = self.scorer.score_pair(&records[left], &records[right]);
            if result.is_match {
                edges.push(PairEvidence::new(left, right, result.score));
            }
        }

        let mut clusters = cluster(&valid_refs, &edges);
        clusters.extend(
            records
                .values()
                .filter(|r| !reports[&r.entity_ref].is_valid)
                .map(|r| DuplicateCluster::singleton(r.entity_ref.clone())),
        );

        // Deterministic id assignment: clusters ordered by their earliest
        // contributing observation, entity_ref as the final key
        clusters.sort_by_key(|c| (cluster_earliest(c, &records), c.members[0].clone()));

        let mut output = ConsolidationOutput {
            restaurants: Vec::new(),
            provenance: Vec::new(),
            validations: Vec::new(),
            rejected,
            needs_manual_review: needs_manual_review.into_iter().collect(),
        };
        let mut city_sequences: BTreeMap<String, u32> = BTreeMap::new();

        for c in &clusters {
            let members: Vec<&CandidateRecord> =
                c.members.iter().map(|m| &records[m]).collect();

            let city = city_slug(earliest_member(&members).and_then(|r| r.address()));
            let seq = city_sequences.entry(city.clone()).or_insert(0);
            *seq += 1;
            let restaurant_id = format!("{}-{:06}", city, seq);

            let mut outcome = self
                .resolver
                .merge_cluster(c, &members, &lookup, &restaurant_id)?;

            // Singleton invalid records keep their original report, which
            // still carries the normalization warnings; merged clusters are
            // re-validated as one record
            let report = if c.len() == 1 && !reports[&c.members[0]].is_valid {
                reports[&c.members[0]].clone()
            } else {
                self.validator.validate(&outcome.merged, now)
            };
            outcome.restaurant.metadata.quality_score = report.quality_score;

            output.validations.push(ValidationResult {
                restaurant_id: restaurant_id.clone(),
                is_valid: report.is_valid,
                quality_score: report.quality_score,
                field_validations: report.field_validations,
                overall_issues: report.issues,
                completeness: report.completeness,
            });
            output.provenance.extend(outcome.provenance);
            output.restaurants.push(outcome.restaurant);
        }

        info!(
            observations = batch_size,
            records = records.len(),
            restaurants = output.restaurants.len(),
            rejected = output.rejected.len(),
            manual_review = output.needs_manual_review.len(),
            "consolidation pass complete"
        );

        Ok(output)
    }
}

fn reject(observation: &FieldObservation, reason: String) -> RejectedObservation {
    debug!(
        entity_ref = %observation.entity_ref,
        field = %observation.field,
        %reason,
        "observation rejected"
    );
    RejectedObservation {
        entity_ref: observation.entity_ref.clone(),
        field: observation.field,
        reason,
        source_url: observation.source_url.clone(),
        content_hash: observation.content_hash.clone(),
        extracted_at: observation.extracted_at,
    }
}

fn cluster_earliest(
    cluster: &DuplicateCluster,
    records: &BTreeMap<String, CandidateRecord>,
) -> DateTime<Utc> {
    cluster
        .members
        .iter()
        .filter_map(|m| records[m].earliest_extracted_at())
        .min()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// The member whose earliest observation came first; its address names the
/// restaurant_id's city
fn earliest_member<'a>(members: &[&'a CandidateRecord]) -> Option<&'a CandidateRecord> {
    members
        .iter()
        .min_by_key(|r| {
            (
                r.earliest_extracted_at().unwrap_or(DateTime::<Utc>::MAX_UTC),
                r.entity_ref.clone(),
            )
        })
        .copied()
}
