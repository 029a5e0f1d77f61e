use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// Configuration for dependency-graph queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// BFS depth cap for impact analysis
    pub max_impact_depth: usize,

    /// Entries listed by fan-in rankings and digests
    pub top_dependents_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_impact_depth: crate::impact::DEFAULT_MAX_DEPTH,
            top_dependents_limit: 10,
        }
    }
}

impl GraphConfig {
    /// Shallow impact queries and short rankings for compact agent context
    pub fn compact() -> Self {
        Self {
            max_impact_depth: 3,
            top_dependents_limit: 5,
        }
    }

    pub fn validated(self) -> crate::Result<Self> {
        self.validate().map_err(GraphError::invalid_config)?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_impact_depth == 0 {
            return Err("max_impact_depth must be greater than 0".to_string());
        }

        if self.top_dependents_limit == 0 {
            return Err("top_dependents_limit must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = GraphConfig::default();
        assert_eq!(config.max_impact_depth, 10);
        assert!(config.validate().is_ok());
        assert!(GraphConfig::compact().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = GraphConfig {
            max_impact_depth: 0,
            ..Default::default()
        };
        let err = config.validated().unwrap_err();
        assert!(err.to_string().contains("max_impact_depth"));
    }
}
