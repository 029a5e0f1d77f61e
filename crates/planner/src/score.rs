use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest and highest task scores
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Score reported when classification itself fails
pub const FALLBACK_SCORE: u8 = 3;

/// Model tier a task is routed to.
///
/// `Inherit` means "use whatever model the calling session runs"; it ranks
/// with the top tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Haiku,
    Sonnet,
    Opus,
    Inherit,
}

impl ModelTier {
    /// Base recommendation for a task score
    pub fn for_score(score: u8) -> Self {
        if score >= 4 {
            ModelTier::Opus
        } else {
            ModelTier::Sonnet
        }
    }

    pub fn priority(self) -> u8 {
        match self {
            ModelTier::Haiku => 0,
            ModelTier::Sonnet => 1,
            ModelTier::Opus | ModelTier::Inherit => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelTier::Haiku => "haiku",
            ModelTier::Sonnet => "sonnet",
            ModelTier::Opus => "opus",
            ModelTier::Inherit => "inherit",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLabel {
    Trivial,
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl ComplexityLabel {
    /// Label for a score already clamped to 1..=5
    pub fn for_score(score: u8) -> Self {
        match score {
            0 | 1 => ComplexityLabel::Trivial,
            2 => ComplexityLabel::Simple,
            3 => ComplexityLabel::Moderate,
            4 => ComplexityLabel::Complex,
            _ => ComplexityLabel::VeryComplex,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComplexityLabel::Trivial => "trivial",
            ComplexityLabel::Simple => "simple",
            ComplexityLabel::Moderate => "moderate",
            ComplexityLabel::Complex => "complex",
            ComplexityLabel::VeryComplex => "very_complex",
        }
    }
}

impl fmt::Display for ComplexityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComplexityScore {
    pub score: u8,
    pub label: ComplexityLabel,
    /// Human-readable reasons the score went up
    pub factors: Vec<String>,
    pub recommended_model: ModelTier,
    pub recommended_agent: String,
}

impl TaskComplexityScore {
    /// Build a score from the raw sum of its factors
    pub fn from_sum(sum: u32, factors: Vec<String>, agent: impl Into<String>) -> Self {
        let score = sum.clamp(u32::from(MIN_SCORE), u32::from(MAX_SCORE)) as u8;
        Self {
            score,
            label: ComplexityLabel::for_score(score),
            factors,
            recommended_model: ModelTier::for_score(score),
            recommended_agent: agent.into(),
        }
    }

    /// Conservative default used when classification cannot run
    pub fn fallback(agent: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            score: FALLBACK_SCORE,
            label: ComplexityLabel::Moderate,
            factors: vec![format!("classification error ({reason}), defaulting")],
            recommended_model: ModelTier::Sonnet,
            recommended_agent: agent.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labels_and_models() {
        let labels: Vec<&str> = (1..=5).map(|s| ComplexityLabel::for_score(s).as_str()).collect();
        assert_eq!(labels, vec!["trivial", "simple", "moderate", "complex", "very_complex"]);

        let models: Vec<ModelTier> = (1..=5).map(ModelTier::for_score).collect();
        assert_eq!(
            models,
            vec![
                ModelTier::Sonnet,
                ModelTier::Sonnet,
                ModelTier::Sonnet,
                ModelTier::Opus,
                ModelTier::Opus
            ]
        );
    }

    #[test]
    fn test_clamping() {
        assert_eq!(TaskComplexityScore::from_sum(9, vec![], "executor").score, 5);
        assert_eq!(TaskComplexityScore::from_sum(0, vec![], "executor").score, 1);
    }

    #[test]
    fn test_serialized_shape() {
        let score = TaskComplexityScore::from_sum(5, vec!["7 files (high)".into()], "executor");
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["label"], "very_complex");
        assert_eq!(json["recommended_model"], "opus");
    }
}
