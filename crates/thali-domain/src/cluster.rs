//! Duplicate clusters produced by blocking + similarity scoring

use serde::{Deserialize, Serialize};

/// A scored pair of candidate records that justified cluster membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairEvidence {
    /// entity_ref of the lexically smaller member
    pub left: String,
    /// entity_ref of the lexically larger member
    pub right: String,
    /// Composite similarity score in [0, 1]
    pub score: f64,
}

impl PairEvidence {
    /// Create evidence with members in canonical (sorted) order
    pub fn new(a: impl Into<String>, b: impl Into<String>, score: f64) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { left: a, right: b, score }
        } else {
            Self { left: b, right: a, score }
        }
    }
}

/// A set of candidate records believed to denote the same real-world
/// restaurant
///
/// Created by the blocking index and similarity scorer, consumed and
/// destroyed by the merge resolver (replaced by one canonical restaurant).
/// Members are held in sorted order so cluster identity is independent of
/// input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    /// entity_refs of the member records, sorted
    pub members: Vec<String>,

    /// The pairwise matches that justified inclusion
    pub evidence: Vec<PairEvidence>,
}

impl DuplicateCluster {
    /// Create a cluster; members are sorted and deduplicated
    pub fn new(mut members: Vec<String>, evidence: Vec<PairEvidence>) -> Self {
        members.sort();
        members.dedup();
        Self { members, evidence }
    }

    /// Create a single-member cluster (pass-through merge)
    pub fn singleton(member: impl Into<String>) -> Self {
        Self {
            members: vec![member.into()],
            evidence: Vec::new(),
        }
    }

    /// Number of member records
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the cluster has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
