//! Field observations - the raw input unit of the consolidation core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an observation, based on UUIDv7
///
/// UUIDv7 provides chronological sortability, which keeps internal bookkeeping
/// stable without any coordination. The identifier never crosses the output
/// boundary; exported artifacts use deterministic derived ids instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationId(u128);

impl ObservationId {
    /// Generate a new UUIDv7-based ObservationId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an ObservationId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ObservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// The kind of upstream collector an observation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// OpenStreetMap discovery
    Osm,
    /// Restaurant website content
    Website,
    /// PDF menu or flyer (OCR'd)
    Pdf,
    /// LLM-based field extraction
    Llm,
    /// Regex-based fallback extraction
    Regex,
}

impl SourceKind {
    /// Get the source kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Osm => "osm",
            SourceKind::Website => "website",
            SourceKind::Pdf => "pdf",
            SourceKind::Llm => "llm",
            SourceKind::Regex => "regex",
        }
    }

    /// Parse a source kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "osm" => Some(SourceKind::Osm),
            "website" => Some(SourceKind::Website),
            "pdf" => Some(SourceKind::Pdf),
            "llm" => Some(SourceKind::Llm),
            "regex" => Some(SourceKind::Regex),
            _ => None,
        }
    }

    /// Default merge priority: higher wins a tie between equally confident,
    /// equally recent observations (llm > website > pdf > osm > regex)
    pub fn default_priority(&self) -> u8 {
        match self {
            SourceKind::Llm => 4,
            SourceKind::Website => 3,
            SourceKind::Pdf => 2,
            SourceKind::Osm => 1,
            SourceKind::Regex => 0,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The restaurant field an observation makes a claim about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Restaurant name
    #[serde(alias = "canonical_name")]
    Name,
    /// Full street address
    #[serde(alias = "address_full")]
    Address,
    /// 6-digit Indian postal code
    Pincode,
    /// Latitude/longitude pair
    Coordinates,
    /// Contact phone number
    Phone,
    /// Website URL
    Website,
    /// Cuisine tags (closed vocabulary)
    Cuisines,
    /// Weekly opening hours
    Hours,
}

impl FieldKind {
    /// All field kinds, in output-schema order
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Name,
        FieldKind::Address,
        FieldKind::Pincode,
        FieldKind::Coordinates,
        FieldKind::Phone,
        FieldKind::Website,
        FieldKind::Cuisines,
        FieldKind::Hours,
    ];

    /// Get the field kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Address => "address",
            FieldKind::Pincode => "pincode",
            FieldKind::Coordinates => "coordinates",
            FieldKind::Phone => "phone",
            FieldKind::Website => "website",
            FieldKind::Cuisines => "cuisines",
            FieldKind::Hours => "hours",
        }
    }

    /// Parse a field kind from a string, accepting the upstream aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" | "canonical_name" => Some(FieldKind::Name),
            "address" | "address_full" => Some(FieldKind::Address),
            "pincode" => Some(FieldKind::Pincode),
            "coordinates" => Some(FieldKind::Coordinates),
            "phone" => Some(FieldKind::Phone),
            "website" => Some(FieldKind::Website),
            "cuisines" => Some(FieldKind::Cuisines),
            "hours" => Some(FieldKind::Hours),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field observation - one claim about one field of one candidate entity
///
/// Observations are immutable once created; the pipeline run that produced
/// them owns them exclusively. Conflicting observations about the same field
/// are reconciled downstream, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldObservation {
    /// Loose entity identifier assigned upstream, not yet canonical
    pub entity_ref: String,

    /// The field this observation makes a claim about
    #[serde(rename = "field_name")]
    pub field: FieldKind,

    /// Raw value as extracted, JSON-ish and untyped
    pub raw_value: serde_json::Value,

    /// Which collector produced this observation
    pub source_kind: SourceKind,

    /// Extraction confidence in [0, 1]
    pub confidence: f64,

    /// URL the value was extracted from
    pub source_url: String,

    /// SHA-256 hash of the fetched content
    pub content_hash: String,

    /// When the value was extracted
    pub extracted_at: DateTime<Utc>,

    /// Model name, present only for LLM-derived observations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Model version, present only for LLM-derived observations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl FieldObservation {
    /// Validate that the observation is structurally usable
    pub fn validate(&self) -> Result<(), String> {
        if self.entity_ref.trim().is_empty() {
            return Err("entity_ref is empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "confidence {} out of range [0.0, 1.0]",
                self.confidence
            ));
        }
        if self.raw_value.is_null() {
            return Err("raw_value is null".to_string());
        }
        Ok(())
    }
}
