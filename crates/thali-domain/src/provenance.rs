//! Provenance records - the audit trail from emitted values back to raw
//! observations

use crate::observation::{FieldKind, SourceKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One (field, contributing observation) audit entry for a canonical
/// restaurant
///
/// Non-winning values are retained with `selected = false`, never deleted,
/// so every emitted value remains auditable back to a raw observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    /// Deterministic identifier: `restaurant_id:field:sequence`
    pub provenance_id: String,

    /// The canonical restaurant this entry belongs to
    pub restaurant_id: String,

    /// The field the observation contributed to
    pub field: FieldKind,

    /// The normalized value the observation contributed (boundary JSON shape)
    pub value: serde_json::Value,

    /// Extraction confidence of the observation
    pub confidence: f64,

    /// URL the value was extracted from
    pub source_url: String,

    /// Content hash of the fetched source
    pub content_hash: String,

    /// Collector kind that produced the observation
    pub extraction_method: SourceKind,

    /// Model name for LLM-derived observations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Model version for LLM-derived observations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,

    /// When the value was extracted
    pub extracted_at: DateTime<Utc>,

    /// Whether this observation's value won the field-level merge
    pub selected: bool,
}

/// An input observation that could not contribute a value, with the reason
///
/// Part of the accounting invariant: every observation is a winning
/// contributor, a retained loser, or rejected with a reason - never silently
/// dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedObservation {
    /// entity_ref of the observation
    pub entity_ref: String,

    /// The field the observation claimed
    pub field: FieldKind,

    /// Why the observation was rejected
    pub reason: String,

    /// URL the value was extracted from
    pub source_url: String,

    /// Content hash of the fetched source
    pub content_hash: String,

    /// When the value was extracted
    pub extracted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_provenance_serialization() {
        let record = ProvenanceRecord {
            provenance_id: "bengaluru-000001:phone:0".to_string(),
            restaurant_id: "bengaluru-000001".to_string(),
            field: FieldKind::Phone,
            value: serde_json::json!("+918022220022"),
            confidence: 0.95,
            source_url: "https://example.in/contact".to_string(),
            content_hash: "deadbeef".to_string(),
            extraction_method: SourceKind::Llm,
            model_name: Some("qwen2:1.5b-instruct".to_string()),
            model_version: Some("2024.02".to_string()),
            extracted_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            selected: true,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["extraction_method"], "llm");
        assert_eq!(json["field"], "phone");
        assert_eq!(json["selected"], true);
    }

    #[test]
    fn test_rejection_carries_reason() {
        let rejected = RejectedObservation {
            entity_ref: "web:42".to_string(),
            field: FieldKind::Phone,
            reason: "invalid phone number: 12345".to_string(),
            source_url: "https://example.in".to_string(),
            content_hash: "cafe".to_string(),
            extracted_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        };
        assert!(rejected.reason.contains("invalid phone"));
    }
}
