//! Pipeline configuration

use serde::{Deserialize, Serialize};
use thali_resolve::ResolverConfig;
use thali_validate::ValidationConfig;

/// Configuration for a full consolidation pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Validation rules and quality scoring
    pub validation: ValidationConfig,

    /// Blocking, similarity and merge parameters
    pub resolver: ResolverConfig,
}

impl PipelineConfig {
    /// Strict preset across all stages
    pub fn strict() -> Self {
        Self {
            validation: ValidationConfig::strict(),
            resolver: ResolverConfig::strict(),
        }
    }

    /// Permissive preset across all stages
    pub fn permissive() -> Self {
        Self {
            validation: ValidationConfig::permissive(),
            resolver: ResolverConfig::permissive(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.validation
            .validate()
            .map_err(|e| format!("validation: {}", e))?;
        self.resolver
            .validate()
            .map_err(|e| format!("resolver: {}", e))?;
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
