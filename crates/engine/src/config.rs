use crate::error::{EngineError, Result};
use codeintel_extract::ExtractConfig;
use codeintel_graph::GraphConfig;
use codeintel_planner::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the whole pipeline, one section per stage.
///
/// ```toml
/// [extract]
/// cache_capacity = 512
///
/// [graph]
/// max_impact_depth = 6
///
/// [classifier]
/// default_profile = "quality"
///
/// [classifier.profiles]
/// frugal = "haiku"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelConfig {
    pub extract: ExtractConfig,
    pub graph: GraphConfig,
    pub classifier: ClassifierConfig,
}

impl IntelConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EngineError::ConfigFormat(e.to_string()))
    }

    /// Parse JSON, falling back to TOML
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match serde_json::from_slice(bytes) {
            Ok(config) => Ok(config),
            Err(json_err) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| EngineError::ConfigFormat(format!("{json_err}; {e}")))?;
                toml::from_str(text).map_err(|toml_err| {
                    EngineError::ConfigFormat(format!("{json_err}; TOML parse error: {toml_err}"))
                })
            }
        }
    }

    /// Load and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| EngineError::io(path, e))?;
        let config = Self::from_bytes(&bytes)?.validated()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.extract.validate().map_err(|e| format!("[extract] {e}"))?;
        self.graph.validate().map_err(|e| format!("[graph] {e}"))?;
        self.classifier
            .validate()
            .map_err(|e| format!("[classifier] {e}"))?;
        Ok(())
    }

    /// Validate every section, reporting the first failure as that
    /// section's own error type
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            extract: self.extract.validated()?,
            graph: self.graph.validated()?,
            classifier: self.classifier.validated()?,
        })
    }
}
