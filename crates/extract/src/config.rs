use crate::error::ExtractError;
use serde::{Deserialize, Serialize};

/// Configuration for signature extraction and repo-map rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Token budget used when the caller does not supply one
    pub default_token_budget: usize,

    /// Characters assumed per estimated token
    pub chars_per_token: usize,

    /// Fraction the rendered map may exceed the nominal budget by
    pub budget_slack: f64,

    /// Signatures listed per file while the budget is comfortable
    pub max_signatures_per_file: usize,

    /// Signatures listed per file once little budget remains
    pub tight_signatures_per_file: usize,

    /// Remaining characters below which the tight cap applies
    pub tight_budget_chars: usize,

    /// Parameter lists longer than this are truncated
    pub max_params_chars: usize,

    /// Export lists longer than this are truncated
    pub max_exports_chars: usize,

    /// Extensions considered source code by the repo map
    pub code_extensions: Vec<String>,

    /// Path fragments excluded from the repo map
    pub skip_path_fragments: Vec<String>,

    /// Entries held by a [`SignatureCache`](crate::SignatureCache)
    pub cache_capacity: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            default_token_budget: 1000,
            chars_per_token: 4,
            budget_slack: 0.2,
            max_signatures_per_file: 30,
            tight_signatures_per_file: 10,
            tight_budget_chars: 2000,
            max_params_chars: 40,
            max_exports_chars: 60,
            code_extensions: [
                "js", "jsx", "mjs", "cjs", "ts", "tsx", "py", "go", "rs", "rb", "ex", "exs",
                "java", "php",
            ]
            .iter()
            .map(|ext| (*ext).to_string())
            .collect(),
            skip_path_fragments: vec!["bin/".into(), "dist/".into(), "build/".into()],
            cache_capacity: 256,
        }
    }
}

impl ExtractConfig {
    /// Smaller per-file listings for very tight prompts
    pub fn compact() -> Self {
        Self {
            max_signatures_per_file: 10,
            tight_signatures_per_file: 5,
            max_params_chars: 24,
            max_exports_chars: 40,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Character budget for a token budget
    pub fn char_budget(&self, token_budget: usize) -> usize {
        token_budget.saturating_mul(self.chars_per_token)
    }

    /// Character ceiling including slack
    pub fn char_ceiling(&self, token_budget: usize) -> f64 {
        self.char_budget(token_budget) as f64 * (1.0 + self.budget_slack)
    }

    pub fn is_code_path(&self, path: &str) -> bool {
        let Some((_, ext)) = path.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.code_extensions.iter().any(|e| *e == ext)
    }

    pub fn is_skipped_path(&self, path: &str) -> bool {
        let normalized = path.replace('\\', "/");
        self.skip_path_fragments.iter().any(|fragment| {
            normalized.starts_with(fragment.as_str())
                || normalized.contains(&format!("/{fragment}"))
        })
    }

    /// Validate, converting the failure into an [`ExtractError`]
    pub fn validated(self) -> crate::Result<Self> {
        self.validate().map_err(ExtractError::invalid_config)?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chars_per_token == 0 {
            return Err("chars_per_token must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.budget_slack) {
            return Err("budget_slack must be between 0.0 and 1.0".to_string());
        }

        if self.max_signatures_per_file == 0 {
            return Err("max_signatures_per_file must be greater than 0".to_string());
        }

        if self.tight_signatures_per_file > self.max_signatures_per_file {
            return Err(
                "tight_signatures_per_file cannot exceed max_signatures_per_file".to_string(),
            );
        }

        if self.max_params_chars < 4 || self.max_exports_chars < 4 {
            return Err("truncation limits must be at least 4 characters".to_string());
        }

        if self.cache_capacity == 0 {
            return Err("cache_capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}
