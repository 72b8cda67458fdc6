//! Pairwise similarity scoring
//!
//! The composite score combines token-sorted name similarity, geographic
//! proximity and an exact-signal bonus. Exact signals alone never decide a
//! match: shared switchboard numbers and aggregator portals are common, so
//! the bonus path additionally requires a minimum name similarity.

use crate::config::ResolverConfig;
use strsim::normalized_levenshtein;
use thali_domain::CandidateRecord;
use thali_normalize::website::domain_key;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// An exact signal shared by both records of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSignal {
    /// Same phone number (last 10 digits)
    Phone,
    /// Same website domain
    Website,
}

/// The scored comparison of one candidate pair
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    /// Token-sorted Levenshtein name similarity in [0, 1]
    pub name_similarity: f64,

    /// Geographic proximity in [0, 1] (1 at zero distance, 0 at the
    /// configured radius)
    pub geo_similarity: f64,

    /// Exact signals both records share
    pub signals: Vec<MatchSignal>,

    /// Weighted composite score in [0, 1]
    pub score: f64,

    /// Whether the pair is considered the same restaurant
    pub is_match: bool,
}

/// Scores candidate pairs against the configured match rule
pub struct Scorer {
    config: ResolverConfig,
}

impl Scorer {
    /// Create a new Scorer with the given configuration
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Score a pair of candidate records
    ///
    /// Symmetric: `score_pair(a, b)` and `score_pair(b, a)` are equal.
    pub fn score_pair(&self, a: &CandidateRecord, b: &CandidateRecord) -> SimilarityResult {
        let name_similarity = match (a.name(), b.name()) {
            (Some(left), Some(right)) => {
                normalized_levenshtein(&token_sort_key(left), &token_sort_key(right))
            }
            _ => 0.0,
        };

        let geo_similarity = match (a.coordinates(), b.coordinates()) {
            (Some((lat_a, lon_a)), Some((lat_b, lon_b))) => {
                let distance = haversine_km(lat_a, lon_a, lat_b, lon_b);
                1.0 - (distance / self.config.geo_radius_km).min(1.0)
            }
            _ => 0.0,
        };

        let mut signals = Vec::new();
        if let (Some(left), Some(right)) = (phone_key(a.phone()), phone_key(b.phone())) {
            if left == right {
                signals.push(MatchSignal::Phone);
            }
        }
        if let (Some(left), Some(right)) = (a.website(), b.website()) {
            let (left, right) = (domain_key(left), domain_key(right));
            if !left.is_empty() && left == right {
                signals.push(MatchSignal::Website);
            }
        }

        // The bonus is applied once however many signals agree
        let bonus = if signals.is_empty() {
            0.0
        } else {
            self.config.exact_bonus
        };

        let score = self.config.name_weight * name_similarity
            + self.config.geo_weight * geo_similarity
            + bonus;

        let is_match = score >= self.config.match_threshold
            || (!signals.is_empty()
                && name_similarity >= self.config.exact_bonus_min_name_similarity);

        SimilarityResult {
            name_similarity,
            geo_similarity,
            signals,
            score,
            is_match,
        }
    }
}

/// Great-circle distance between two coordinate pairs in kilometers
pub fn haversine_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Lowercased alphanumeric tokens, sorted and rejoined, so word order does
/// not affect the edit distance
fn token_sort_key(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Last 10 digits of a phone number; shorter numbers carry no signal
fn phone_key(phone: Option<&str>) -> Option<String> {
    let digits: String = phone?.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 10 {
        Some(digits[digits.len() - 10..].to_string())
    } else {
        None
    }
}
