//! Resolver configuration

use serde::{Deserialize, Serialize};
use thali_domain::SourceKind;

/// Configuration for blocking, similarity scoring and merging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Composite score at or above which a pair is a match
    pub match_threshold: f64,

    /// Weight of name similarity in the composite score
    pub name_weight: f64,

    /// Weight of geographic proximity in the composite score
    pub geo_weight: f64,

    /// Bonus added once when an exact signal (phone or website domain)
    /// matches
    pub exact_bonus: f64,

    /// An exact signal alone only matches when name similarity is at least
    /// this high; different restaurants do share switchboards and portals
    pub exact_bonus_min_name_similarity: f64,

    /// Distance at which geographic similarity reaches zero
    pub geo_radius_km: f64,

    /// Blocking grid cell size in degrees (0.01 is roughly 1.1 km of
    /// latitude)
    pub grid_cell_deg: f64,

    /// Merge tie-break priority between source kinds, highest first
    pub source_priority: Vec<SourceKind>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.82,
            name_weight: 0.5,
            geo_weight: 0.3,
            exact_bonus: 0.2,
            exact_bonus_min_name_similarity: 0.5,
            geo_radius_km: 2.0,
            grid_cell_deg: 0.01,
            source_priority: vec![
                SourceKind::Llm,
                SourceKind::Website,
                SourceKind::Pdf,
                SourceKind::Osm,
                SourceKind::Regex,
            ],
        }
    }
}

impl ResolverConfig {
    /// Strict preset: higher match bar, tighter geography
    pub fn strict() -> Self {
        Self {
            match_threshold: 0.90,
            exact_bonus_min_name_similarity: 0.7,
            geo_radius_km: 1.0,
            ..Self::default()
        }
    }

    /// Permissive preset: lower match bar, wider geography
    pub fn permissive() -> Self {
        Self {
            match_threshold: 0.75,
            exact_bonus_min_name_similarity: 0.4,
            geo_radius_km: 5.0,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(format!(
                "match_threshold {} out of range [0.0, 1.0]",
                self.match_threshold
            ));
        }
        let total = self.name_weight + self.geo_weight + self.exact_bonus;
        if (total - 1.0).abs() > 1e-6 {
            return Err(format!("score weights must sum to 1.0, got {}", total));
        }
        if self.name_weight < 0.0 || self.geo_weight < 0.0 || self.exact_bonus < 0.0 {
            return Err("score weights must be non-negative".to_string());
        }
        if !(0.0..=1.0).contains(&self.exact_bonus_min_name_similarity) {
            return Err("exact_bonus_min_name_similarity out of range [0.0, 1.0]".to_string());
        }
        if self.geo_radius_km <= 0.0 {
            return Err("geo_radius_km must be positive".to_string());
        }
        if self.grid_cell_deg <= 0.0 {
            return Err("grid_cell_deg must be positive".to_string());
        }
        if self.source_priority.is_empty() {
            return Err("source_priority must not be empty".to_string());
        }
        Ok(())
    }

    /// Tie-break priority of a source kind; higher wins. Kinds absent from
    /// the configured list rank below every listed kind.
    pub fn priority(&self, kind: SourceKind) -> usize {
        self.source_priority
            .iter()
            .position(|k| *k == kind)
            .map(|i| self.source_priority.len() - i)
            .unwrap_or(0)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
