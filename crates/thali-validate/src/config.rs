//! Validator configuration

use serde::{Deserialize, Serialize};

/// Completeness weights per expected field (must sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletenessWeights {
    /// Weight of a populated name
    pub name: f64,
    /// Weight of a populated address
    pub address: f64,
    /// Weight of a populated phone
    pub phone: f64,
    /// Weight of a populated coordinate pair
    pub coordinates: f64,
    /// Weight of populated hours
    pub hours: f64,
    /// Weight of populated cuisines
    pub cuisines: f64,
}

impl Default for CompletenessWeights {
    fn default() -> Self {
        Self {
            name: 0.25,
            address: 0.20,
            phone: 0.15,
            coordinates: 0.20,
            hours: 0.10,
            cuisines: 0.10,
        }
    }
}

impl CompletenessWeights {
    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.name + self.address + self.phone + self.coordinates + self.hours + self.cuisines
    }
}

/// Configuration for validation rules and quality scoring
///
/// Passed explicitly into the validator rather than read from ambient
/// environment state, so runs against the gold set are repeatable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Completeness weights
    pub weights: CompletenessWeights,

    /// Score penalty per fatal issue
    pub fatal_penalty: f64,

    /// Score penalty per warning (kept below the smallest completeness
    /// weight so adding a field never lowers the score)
    pub warning_penalty: f64,

    /// India bounding box: minimum latitude
    pub lat_min: f64,
    /// India bounding box: maximum latitude
    pub lat_max: f64,
    /// India bounding box: minimum longitude
    pub lon_min: f64,
    /// India bounding box: maximum longitude
    pub lon_max: f64,

    /// Records whose observations are all older than this many days get a
    /// staleness warning
    pub staleness_days: i64,

    /// Enable the pincode/coordinate regional consistency check
    pub check_pincode_region: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            weights: CompletenessWeights::default(),
            fatal_penalty: 0.4,
            warning_penalty: 0.05,
            lat_min: 6.0,
            lat_max: 38.0,
            lon_min: 68.0,
            lon_max: 98.0,
            staleness_days: 365,
            check_pincode_region: true,
        }
    }
}

impl ValidationConfig {
    /// Strict preset: heavier penalties, shorter staleness window
    pub fn strict() -> Self {
        Self {
            fatal_penalty: 0.6,
            warning_penalty: 0.08,
            staleness_days: 90,
            ..Self::default()
        }
    }

    /// Permissive preset: no regional check, long staleness window
    pub fn permissive() -> Self {
        Self {
            fatal_penalty: 0.3,
            warning_penalty: 0.02,
            staleness_days: 3 * 365,
            check_pincode_region: false,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let total = self.weights.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(format!("completeness weights must sum to 1.0, got {}", total));
        }
        if self.fatal_penalty < 0.0 || self.warning_penalty < 0.0 {
            return Err("penalties must be non-negative".to_string());
        }
        if self.lat_min >= self.lat_max || self.lon_min >= self.lon_max {
            return Err("bounding box is inverted".to_string());
        }
        if self.staleness_days <= 0 {
            return Err("staleness_days must be positive".to_string());
        }
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ValidationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ValidationConfig::strict().validate().is_ok());
        assert!(ValidationConfig::permissive().validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = ValidationConfig::default();
        config.weights.name = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ValidationConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ValidationConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
