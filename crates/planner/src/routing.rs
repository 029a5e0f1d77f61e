use crate::config::ClassifierConfig;
use crate::score::{ModelTier, TaskComplexityScore};
use serde::{Deserialize, Serialize};

/// Where a task should run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub model: ModelTier,
    pub agent: String,
    pub reason: String,
}

/// Route a scored task under `config`.
///
/// With a known profile (explicit, else the configured default) the higher
/// of the profile's tier and the score's base tier wins; unknown profiles
/// fall back to the base tier. The top tier is reported as
/// [`ModelTier::Inherit`] so the caller's own model is reused.
pub fn route_task_with(
    config: &ClassifierConfig,
    score: &TaskComplexityScore,
    profile: Option<&str>,
) -> RouteDecision {
    let base = ModelTier::for_score(score.score);
    let profile = profile.or(config.default_profile.as_deref());

    let (model, reason) = match profile.and_then(|name| Some((name, *config.profiles.get(name)?))) {
        Some((name, tier)) => {
            let model = if tier.priority() >= base.priority() { tier } else { base };
            (model, format!("score {} ({}) via {name} profile", score.score, score.label))
        }
        None => {
            if let Some(name) = profile {
                log::debug!("Unknown model profile '{name}', using base tier");
            }
            (base, format!("score {} ({})", score.score, score.label))
        }
    };

    RouteDecision {
        model: if model == ModelTier::Opus { ModelTier::Inherit } else { model },
        agent: config.executor_agent.clone(),
        reason,
    }
}

/// Route a scored task with the default profile table
pub fn route_task(score: &TaskComplexityScore, profile: Option<&str>) -> RouteDecision {
    route_task_with(&ClassifierConfig::default(), score, profile)
}
