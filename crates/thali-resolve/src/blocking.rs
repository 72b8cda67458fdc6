//! Blocking index - narrows the pair space before similarity scoring
//!
//! Two records become a candidate pair when they share a coordinate grid
//! cell (including the 8 neighboring cells, so near-boundary points still
//! pair) or a name token. Records with neither signal cannot be blocked and
//! are surfaced for manual review instead of being compared against
//! everything.

use crate::config::ResolverConfig;
use std::collections::{BTreeMap, BTreeSet};
use thali_domain::CandidateRecord;
use tracing::debug;

/// Name tokens too common to discriminate between restaurants
const STOPWORDS: &[&str] = &["the", "and", "of", "hotel", "restaurant"];

/// Candidate pairs produced by blocking, plus the records blocking could not
/// place in any bucket
#[derive(Debug, Clone, Default)]
pub struct BlockingIndex {
    pairs: BTreeSet<(String, String)>,
    unblocked: Vec<String>,
}

impl BlockingIndex {
    /// Build the index over a set of candidate records
    pub fn build(records: &[&CandidateRecord], config: &ResolverConfig) -> Self {
        let mut grid: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
        let mut token_buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut unblocked = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let mut placed = false;

            if let Some((lat, lon)) = record.coordinates() {
                grid.entry(grid_cell(lat, lon, config.grid_cell_deg))
                    .or_default()
                    .push(idx);
                placed = true;
            }

            if let Some(name) = record.name() {
                for token in name_tokens(name) {
                    token_buckets.entry(token).or_default().push(idx);
                    placed = true;
                }
            }

            if !placed {
                unblocked.push(record.entity_ref.clone());
            }
        }

        let mut pairs = BTreeSet::new();

        for (&(row, col), members) in &grid {
            for &a in members {
                // Own cell plus the 8 neighbors; scanning only forward
                // neighbors would miss pairs split across the seam
                for dr in -1..=1 {
                    for dc in -1..=1 {
                        if let Some(others) = grid.get(&(row + dr, col + dc)) {
                            for &b in others {
                                push_pair(&mut pairs, records, a, b);
                            }
                        }
                    }
                }
            }
        }

        for members in token_buckets.values() {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    push_pair(&mut pairs, records, a, b);
                }
            }
        }

        debug!(
            records = records.len(),
            pairs = pairs.len(),
            unblocked = unblocked.len(),
            "blocking index built"
        );

        Self { pairs, unblocked }
    }

    /// Candidate pairs in canonical (sorted) order
    pub fn candidate_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Number of candidate pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether blocking produced no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// entity_refs of records with neither coordinates nor usable name
    /// tokens
    pub fn unblocked(&self) -> &[String] {
        &self.unblocked
    }
}

fn push_pair(
    pairs: &mut BTreeSet<(String, String)>,
    records: &[&CandidateRecord],
    a: usize,
    b: usize,
) {
    if a == b {
        return;
    }
    let (left, right) = if records[a].entity_ref <= records[b].entity_ref {
        (&records[a].entity_ref, &records[b].entity_ref)
    } else {
        (&records[b].entity_ref, &records[a].entity_ref)
    };
    pairs.insert((left.clone(), right.clone()));
}

/// Truncating coordinate grid cell
fn grid_cell(lat: f64, lon: f64, cell_deg: f64) -> (i64, i64) {
    ((lat / cell_deg).floor() as i64, (lon / cell_deg).floor() as i64)
}

/// Lowercased alphanumeric name tokens, minus stopwords and single
/// characters
fn name_tokens(name: &str) -> BTreeSet<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}
