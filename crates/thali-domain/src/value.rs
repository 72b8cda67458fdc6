//! Typed canonical field values

use crate::hours::WeeklyHours;
use crate::observation::FieldKind;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;

/// Closed cuisine vocabulary
///
/// Free-text cuisine terms are mapped into this vocabulary during
/// normalization; unmapped terms are dropped, never kept as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cuisine {
    /// North Indian (Punjabi, Rajasthani, tandoor, ...)
    NorthIndian,
    /// South Indian (Tamil, Kerala, Andhra, Chettinad, ...)
    SouthIndian,
    /// Chinese and Indo-Chinese
    Chinese,
    /// Street food, chaat, snacks
    StreetFood,
    /// Bakery and pastry
    Bakery,
    /// Cafe, coffee, tea
    Cafe,
    /// Italian, pizza, pasta
    Italian,
    /// Mughlai (Awadhi, Lucknowi, ...)
    Mughlai,
    /// Seafood and coastal
    Seafood,
}

impl Cuisine {
    /// All vocabulary members
    pub const ALL: [Cuisine; 9] = [
        Cuisine::NorthIndian,
        Cuisine::SouthIndian,
        Cuisine::Chinese,
        Cuisine::StreetFood,
        Cuisine::Bakery,
        Cuisine::Cafe,
        Cuisine::Italian,
        Cuisine::Mughlai,
        Cuisine::Seafood,
    ];

    /// Get the vocabulary term as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::NorthIndian => "NORTH_INDIAN",
            Cuisine::SouthIndian => "SOUTH_INDIAN",
            Cuisine::Chinese => "CHINESE",
            Cuisine::StreetFood => "STREET_FOOD",
            Cuisine::Bakery => "BAKERY",
            Cuisine::Cafe => "CAFE",
            Cuisine::Italian => "ITALIAN",
            Cuisine::Mughlai => "MUGHLAI",
            Cuisine::Seafood => "SEAFOOD",
        }
    }

    /// Parse an exact vocabulary term (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Cuisine::ALL.iter().copied().find(|c| c.as_str() == upper)
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonicalized, typed field value
///
/// One variant per field kind, so a normalization failure is an explicit
/// typed outcome rather than a silently coerced string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Canonical restaurant name
    Name(String),
    /// Cleaned full address
    Address(String),
    /// 6-digit pincode
    Pincode(String),
    /// Coordinate pair
    Coordinates {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lon: f64,
    },
    /// E.164-style Indian phone number
    Phone(String),
    /// Normalized website URL
    Website(String),
    /// Closed-vocabulary cuisine set
    Cuisines(BTreeSet<Cuisine>),
    /// Weekly opening hours
    Hours(WeeklyHours),
}

impl FieldValue {
    /// The field kind this value belongs to
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Name(_) => FieldKind::Name,
            FieldValue::Address(_) => FieldKind::Address,
            FieldValue::Pincode(_) => FieldKind::Pincode,
            FieldValue::Coordinates { .. } => FieldKind::Coordinates,
            FieldValue::Phone(_) => FieldKind::Phone,
            FieldValue::Website(_) => FieldKind::Website,
            FieldValue::Cuisines(_) => FieldKind::Cuisines,
            FieldValue::Hours(_) => FieldKind::Hours,
        }
    }

    /// The bare JSON value as it appears at the output boundary
    /// (no `kind` tag: a string, an array, or an object)
    pub fn boundary_value(&self) -> serde_json::Value {
        match self {
            FieldValue::Name(s)
            | FieldValue::Address(s)
            | FieldValue::Pincode(s)
            | FieldValue::Phone(s)
            | FieldValue::Website(s) => json!(s),
            FieldValue::Coordinates { lat, lon } => json!({ "lat": lat, "lon": lon }),
            FieldValue::Cuisines(set) => json!(set),
            FieldValue::Hours(hours) => serde_json::to_value(hours).unwrap_or(json!({})),
        }
    }

    /// Borrow the inner string for the string-valued variants
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Name(s)
            | FieldValue::Address(s)
            | FieldValue::Pincode(s)
            | FieldValue::Phone(s)
            | FieldValue::Website(s) => Some(s),
            _ => None,
        }
    }
}
