//! Cuisine mapping into the closed vocabulary

use crate::error::NormalizeError;
use crate::Normalized;
use serde_json::Value;
use std::collections::BTreeSet;
use thali_domain::{Cuisine, FieldKind, FieldValue, ValidationIssue};
use tracing::debug;

/// Free-text synonym table, lowercase term -> vocabulary member
const SYNONYMS: [(&str, Cuisine); 44] = [
    // North Indian variations
    ("north indian", Cuisine::NorthIndian),
    ("punjabi", Cuisine::NorthIndian),
    ("rajasthani", Cuisine::NorthIndian),
    ("hindi", Cuisine::NorthIndian),
    ("tandoor", Cuisine::NorthIndian),
    // South Indian variations
    ("south indian", Cuisine::SouthIndian),
    ("tamil", Cuisine::SouthIndian),
    ("kerala", Cuisine::SouthIndian),
    ("andhra", Cuisine::SouthIndian),
    ("karnataka", Cuisine::SouthIndian),
    ("chettinad", Cuisine::SouthIndian),
    ("malabari", Cuisine::SouthIndian),
    // Chinese variations
    ("chinese", Cuisine::Chinese),
    ("indo-chinese", Cuisine::Chinese),
    ("indo chinese", Cuisine::Chinese),
    ("hakka", Cuisine::Chinese),
    ("szechuan", Cuisine::Chinese),
    ("canton", Cuisine::Chinese),
    // Street food variations
    ("street food", Cuisine::StreetFood),
    ("chaat", Cuisine::StreetFood),
    ("fast food", Cuisine::StreetFood),
    ("snacks", Cuisine::StreetFood),
    // Bakery variations
    ("bakery", Cuisine::Bakery),
    ("baked", Cuisine::Bakery),
    ("pastry", Cuisine::Bakery),
    // Cafe variations
    ("cafe", Cuisine::Cafe),
    ("coffee", Cuisine::Cafe),
    ("tea", Cuisine::Cafe),
    ("beverages", Cuisine::Cafe),
    // Italian variations
    ("italian", Cuisine::Italian),
    ("pizza", Cuisine::Italian),
    ("pasta", Cuisine::Italian),
    ("mediterranean", Cuisine::Italian),
    // Mughlai variations
    ("mughlai", Cuisine::Mughlai),
    ("mughal", Cuisine::Mughlai),
    ("nawabi", Cuisine::Mughlai),
    ("lucknowi", Cuisine::Mughlai),
    ("awadhi", Cuisine::Mughlai),
    // Seafood variations
    ("seafood", Cuisine::Seafood),
    ("fish", Cuisine::Seafood),
    ("coastal", Cuisine::Seafood),
    ("goan", Cuisine::Seafood),
    ("mangalorean", Cuisine::Seafood),
    ("marine", Cuisine::Seafood),
];

/// Map a single free-text term into the vocabulary
///
/// Tries an exact vocabulary match, then the synonym table, then substring
/// matching in either direction. Returns None for unmappable terms.
pub fn map_term(term: &str) -> Option<Cuisine> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(cuisine) = Cuisine::parse(trimmed) {
        return Some(cuisine);
    }

    let lower = trimmed.to_lowercase();
    if let Some((_, cuisine)) = SYNONYMS.iter().find(|(syn, _)| *syn == lower) {
        return Some(*cuisine);
    }

    SYNONYMS
        .iter()
        .find(|(syn, _)| lower.contains(syn) || syn.contains(lower.as_str()))
        .map(|(_, cuisine)| *cuisine)
}

/// Normalize a cuisine payload (an array of terms, or a single term) into a
/// vocabulary set
///
/// Unmapped terms are dropped, not retained as free text; the drop is
/// recorded as an issue so provenance accounting stays complete.
pub fn normalize_cuisines(raw: &Value) -> Result<Normalized, NormalizeError> {
    let terms: Vec<&str> = match raw {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        other => {
            return Err(NormalizeError::UnexpectedShape {
                field: FieldKind::Cuisines,
                detail: format!("expected a string or array of strings, got {}", other),
            })
        }
    };

    let mut mapped = BTreeSet::new();
    let mut dropped = Vec::new();

    for term in terms {
        match map_term(term) {
            Some(cuisine) => {
                mapped.insert(cuisine);
            }
            None => {
                if !term.trim().is_empty() {
                    dropped.push(term.trim().to_string());
                }
            }
        }
    }

    let mut issues = Vec::new();
    if !dropped.is_empty() {
        debug!(?dropped, "cuisine terms outside the vocabulary were dropped");
        issues.push(
            ValidationIssue::warning(
                "cuisine_unmapped",
                format!("dropped terms outside the vocabulary: {}", dropped.join(", ")),
            )
            .with_field(FieldKind::Cuisines),
        );
    }

    Ok(Normalized {
        value: if mapped.is_empty() {
            None
        } else {
            Some(FieldValue::Cuisines(mapped))
        },
        issues,
    })
}
