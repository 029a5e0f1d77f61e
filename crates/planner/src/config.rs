use crate::error::PlannerError;
use crate::score::ModelTier;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Matches common test-runner invocations in task text
pub const DEFAULT_TEST_PATTERN: &str =
    r"(?i)\btest\b|npm\s+test|pytest|jest|mocha|vitest|go\s+test|mix\s+test";

/// Configuration for task classification and routing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Declared files at which a task counts as touching some files (+1)
    pub some_files: usize,

    /// Declared files at which a task counts as touching many files (+2)
    pub many_files: usize,

    /// Importers of the task's files for a moderate blast radius (+1)
    pub some_importers: usize,

    /// Importers of the task's files for a high blast radius (+2)
    pub many_importers: usize,

    /// Action text longer than this (in characters) adds +1
    pub long_action_chars: usize,

    /// Regex recognizing test invocations in action/verify text
    pub test_pattern: String,

    /// Agent every task is routed to
    pub executor_agent: String,

    /// Profile name → model tier the executor runs under that profile
    pub profiles: BTreeMap<String, ModelTier>,

    /// Profile applied when routing without an explicit one
    pub default_profile: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let profiles = [
            ("quality", ModelTier::Opus),
            ("balanced", ModelTier::Sonnet),
            ("budget", ModelTier::Sonnet),
        ]
        .into_iter()
        .map(|(name, tier)| (name.to_string(), tier))
        .collect();

        Self {
            some_files: 3,
            many_files: 6,
            some_importers: 3,
            many_importers: 6,
            long_action_chars: 800,
            test_pattern: DEFAULT_TEST_PATTERN.to_string(),
            executor_agent: "executor".to_string(),
            profiles,
            default_profile: None,
        }
    }
}

impl ClassifierConfig {
    /// Route every task through the `quality` profile
    pub fn quality() -> Self {
        Self {
            default_profile: Some("quality".to_string()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_profile(mut self, name: impl Into<String>, tier: ModelTier) -> Self {
        self.profiles.insert(name.into(), tier);
        self
    }

    pub fn validated(self) -> crate::Result<Self> {
        Regex::new(&self.test_pattern)?;
        self.validate().map_err(PlannerError::invalid_config)?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.some_files == 0 || self.some_files > self.many_files {
            return Err("file thresholds must satisfy 0 < some_files <= many_files".to_string());
        }

        if self.some_importers == 0 || self.some_importers > self.many_importers {
            return Err(
                "importer thresholds must satisfy 0 < some_importers <= many_importers".to_string(),
            );
        }

        if self.executor_agent.trim().is_empty() {
            return Err("executor_agent cannot be empty".to_string());
        }

        if let Some(profile) = &self.default_profile {
            if !self.profiles.contains_key(profile) {
                return Err(format!("default_profile '{profile}' is not a known profile"));
            }
        }

        Ok(())
    }
}
