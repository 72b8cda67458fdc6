//! Thali Normalizer
//!
//! Canonicalizes raw field observations into typed values. Normalization is a
//! pure function of the field kind and raw value: same input always yields
//! the same output, with no shared state and no I/O.
//!
//! Failure behavior differs per field kind:
//! - phone, website, coordinates: hard typed failures ([`NormalizeError`])
//! - pincode, hours: soft failures (a null/empty value plus a recorded issue)
//! - address, name: best-effort, never fail
//! - cuisines: unmapped terms are dropped and the drop is recorded

#![warn(clippy::all)]

pub mod address;
pub mod cuisines;
pub mod error;
pub mod hours;
pub mod name;
pub mod phone;
pub mod pincode;
pub mod website;

pub use error::NormalizeError;

use serde_json::Value;
use thali_domain::{
    FieldKind, FieldObservation, FieldValue, NormalizedValue, ObservationId, ValidationIssue,
};
use tracing::debug;

/// Outcome of normalizing one raw value
///
/// `value` is `None` for soft failures (e.g. a malformed pincode), in which
/// case `issues` explains why.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    /// The canonical value, when one could be produced
    pub value: Option<FieldValue>,

    /// Issues recorded while normalizing (soft failures, dropped terms)
    pub issues: Vec<ValidationIssue>,
}

impl Normalized {
    fn value(value: FieldValue) -> Self {
        Self {
            value: Some(value),
            issues: Vec::new(),
        }
    }
}

/// Normalize a raw value for a field kind
///
/// Pure and idempotent: feeding a produced value back through yields the
/// same result.
pub fn normalize(field: FieldKind, raw: &Value) -> Result<Normalized, NormalizeError> {
    match field {
        FieldKind::Name => Ok(Normalized::value(FieldValue::Name(name::normalize_name(
            as_str(field, raw)?,
        )))),
        FieldKind::Address => Ok(Normalized::value(FieldValue::Address(
            address::normalize_address(&address_text(raw)?),
        ))),
        FieldKind::Pincode => Ok(pincode::normalize_pincode(&scalar_text(field, raw)?)),
        FieldKind::Coordinates => {
            let (lat, lon) = coordinates_pair(raw)?;
            Ok(Normalized::value(FieldValue::Coordinates { lat, lon }))
        }
        FieldKind::Phone => {
            let value = phone::normalize_phone(&scalar_text(field, raw)?)?;
            Ok(Normalized::value(FieldValue::Phone(value)))
        }
        FieldKind::Website => {
            let value = website::normalize_website(as_str(field, raw)?)?;
            Ok(Normalized::value(FieldValue::Website(value)))
        }
        FieldKind::Cuisines => Ok(cuisines::normalize_cuisines(raw)?),
        FieldKind::Hours => Ok(hours::normalize_hours(raw)?),
    }
}

/// Normalize a full observation into a value carrying its envelope
///
/// The observation id is assigned by the caller (the pipeline owns the batch).
pub fn normalize_observation(
    id: ObservationId,
    observation: &FieldObservation,
) -> Result<(Option<NormalizedValue>, Vec<ValidationIssue>), NormalizeError> {
    let normalized = normalize(observation.field, &observation.raw_value)?;

    if normalized.value.is_none() {
        debug!(
            entity_ref = %observation.entity_ref,
            field = %observation.field,
            "normalization produced no value"
        );
    }

    let value = normalized.value.map(|value| NormalizedValue {
        observation: id,
        value,
        confidence: observation.confidence,
        source_kind: observation.source_kind,
        extracted_at: observation.extracted_at,
        content_hash: observation.content_hash.clone(),
    });

    Ok((value, normalized.issues))
}

fn as_str<'a>(field: FieldKind, raw: &'a Value) -> Result<&'a str, NormalizeError> {
    raw.as_str().ok_or_else(|| NormalizeError::UnexpectedShape {
        field,
        detail: format!("expected a string, got {}", json_type(raw)),
    })
}

/// Phone and pincode payloads occasionally arrive as bare numbers
fn scalar_text(field: FieldKind, raw: &Value) -> Result<String, NormalizeError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(NormalizeError::UnexpectedShape {
            field,
            detail: format!("expected a string or number, got {}", json_type(other)),
        }),
    }
}

/// Address payloads arrive as a plain string or as `{"full": "..."}`
fn address_text(raw: &Value) -> Result<String, NormalizeError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => match map.get("full").and_then(Value::as_str) {
            Some(full) => Ok(full.to_string()),
            None => Err(NormalizeError::UnexpectedShape {
                field: FieldKind::Address,
                detail: "object payload is missing a string \"full\" key".to_string(),
            }),
        },
        other => Err(NormalizeError::UnexpectedShape {
            field: FieldKind::Address,
            detail: format!("expected a string or object, got {}", json_type(other)),
        }),
    }
}

/// Coordinate payloads arrive as `{"lat": .., "lon": ..}` or `[lat, lon]`
fn coordinates_pair(raw: &Value) -> Result<(f64, f64), NormalizeError> {
    let pair = match raw {
        Value::Object(map) => {
            let lat = map.get("lat").and_then(Value::as_f64);
            let lon = map.get("lon").and_then(Value::as_f64);
            lat.zip(lon)
        }
        Value::Array(items) if items.len() == 2 => {
            items[0].as_f64().zip(items[1].as_f64())
        }
        _ => None,
    };

    let (lat, lon) = pair.ok_or_else(|| {
        NormalizeError::InvalidCoordinates(format!("unusable payload: {}", raw))
    })?;

    if !lat.is_finite() || !lon.is_finite() {
        return Err(NormalizeError::InvalidCoordinates(format!(
            "non-finite pair ({}, {})",
            lat, lon
        )));
    }

    Ok((lat, lon))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
