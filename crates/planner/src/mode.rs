use crate::plan::PlanClassification;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a batch of plans should be scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Single,
    Sequential,
    Parallel,
    Pipeline,
}

impl ExecutionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Single => "single",
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling decision for a batch of classified plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionModeDecision {
    pub mode: ExecutionMode,
    pub reason: String,
    /// Wave number → plan names, in batch order
    pub waves: BTreeMap<u32, Vec<String>>,
    pub total_plans: usize,
    pub total_waves: usize,
    pub has_checkpoints: bool,
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Choose how to schedule `plans`.
///
/// Any checkpoint task forces sequential execution. Otherwise a lone small
/// plan runs as `single`, a wave with several plans runs `parallel`, three
/// or more waves form a `pipeline`, and everything else is `sequential`.
pub fn select_execution_mode(plans: &[PlanClassification]) -> ExecutionModeDecision {
    let mut waves: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for plan in plans {
        waves.entry(plan.wave.max(1)).or_default().push(plan.plan.clone());
    }
    let total_plans = plans.len();
    let total_waves = waves.len();
    let has_checkpoints = plans.iter().any(PlanClassification::has_checkpoints);

    let decide = |mode, reason: String| {
        log::debug!("Execution mode {mode}: {reason}");
        ExecutionModeDecision {
            mode,
            reason,
            waves: waves.clone(),
            total_plans,
            total_waves,
            has_checkpoints,
        }
    };

    if plans.is_empty() {
        return decide(ExecutionMode::Single, "no plans to execute".to_string());
    }

    if has_checkpoints {
        return decide(
            ExecutionMode::Sequential,
            "plan has checkpoint tasks requiring human interaction".to_string(),
        );
    }

    if let [plan] = plans {
        if plan.task_count <= 2 {
            return decide(
                ExecutionMode::Single,
                format!("1 plan with {}", plural(plan.task_count, "task")),
            );
        }
    }

    if let Some((wave, names)) = waves.iter().find(|(_, names)| names.len() > 1) {
        return decide(
            ExecutionMode::Parallel,
            format!("{} independent plans in wave {wave}", names.len()),
        );
    }

    if total_waves >= 3 {
        return decide(
            ExecutionMode::Pipeline,
            format!("{total_waves} waves requiring sequential execution"),
        );
    }

    decide(
        ExecutionMode::Sequential,
        format!("{} across {}", plural(total_plans, "plan"), plural(total_waves, "wave")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ClassifiedTask, PlanMetadata};
    use crate::score::TaskComplexityScore;
    use crate::task::{Task, TaskType};
    use pretty_assertions::assert_eq;

    fn plan(name: &str, wave: u32, types: &[TaskType]) -> PlanClassification {
        let tasks = types
            .iter()
            .map(|t| {
                (
                    Task::new("t", t.clone()),
                    TaskComplexityScore::from_sum(1, vec![], "executor"),
                )
            })
            .collect();
        PlanClassification::from_scored(name, PlanMetadata { wave, autonomous: true }, tasks)
    }

    fn autos(n: usize) -> Vec<TaskType> {
        vec![TaskType::Auto; n]
    }

    #[test]
    fn test_empty_batch() {
        let decision = select_execution_mode(&[]);
        assert_eq!(decision.mode, ExecutionMode::Single);
        assert_eq!(decision.reason, "no plans to execute");
        assert_eq!(decision.total_waves, 0);
    }

    #[test]
    fn test_single_small_plan() {
        let decision = select_execution_mode(&[plan("a", 1, &autos(1))]);
        assert_eq!(decision.mode, ExecutionMode::Single);
        assert_eq!(decision.reason, "1 plan with 1 task");
    }

    #[test]
    fn test_single_large_plan_is_sequential() {
        let decision = select_execution_mode(&[plan("a", 1, &autos(3))]);
        assert_eq!(decision.mode, ExecutionMode::Sequential);
        assert_eq!(decision.reason, "1 plan across 1 wave");
    }

    #[test]
    fn test_same_wave_is_parallel() {
        let decision = select_execution_mode(&[plan("a", 1, &autos(3)), plan("b", 1, &autos(1))]);
        assert_eq!(decision.mode, ExecutionMode::Parallel);
        assert_eq!(decision.reason, "2 independent plans in wave 1");
        assert_eq!(decision.waves[&1], vec!["a", "b"]);
    }

    #[test]
    fn test_three_waves_is_pipeline() {
        let plans = [plan("a", 1, &autos(1)), plan("b", 2, &autos(1)), plan("c", 3, &autos(1))];
        let decision = select_execution_mode(&plans);
        assert_eq!(decision.mode, ExecutionMode::Pipeline);
        assert_eq!(decision.total_waves, 3);
    }

    #[test]
    fn test_two_waves_is_sequential() {
        let decision = select_execution_mode(&[plan("a", 1, &autos(1)), plan("b", 2, &autos(1))]);
        assert_eq!(decision.mode, ExecutionMode::Sequential);
        assert_eq!(decision.reason, "2 plans across 2 waves");
    }

    #[test]
    fn test_checkpoint_forces_sequential() {
        let plans = [
            plan("a", 1, &autos(1)),
            plan("b", 1, &[TaskType::Auto, TaskType::Checkpoint("review".into())]),
        ];
        let decision = select_execution_mode(&plans);
        assert_eq!(decision.mode, ExecutionMode::Sequential);
        assert!(decision.has_checkpoints);
    }

    #[test]
    fn test_classified_task_type_drives_checkpoints() {
        let mut p = plan("a", 1, &autos(1));
        p.tasks.push(ClassifiedTask {
            name: "gate".into(),
            task_type: TaskType::CheckpointDecision,
            files: vec![],
            complexity: TaskComplexityScore::from_sum(2, vec![], "executor"),
        });
        assert!(select_execution_mode(&[p]).has_checkpoints);
    }
}
