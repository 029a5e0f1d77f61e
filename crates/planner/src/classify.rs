//! Task complexity classification.
//!
//! A task starts at 1 and gains points for the number of files it declares,
//! how many files import those files, test work, human checkpoints and the
//! length of its action text. The sum is clamped to 1..=5.

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::score::TaskComplexityScore;
use crate::task::Task;
use codeintel_graph::DependencyGraph;
use regex::Regex;

fn normalize(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let mut rest = path.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_string()
}

/// Whether a graph key and a declared task file name the same file.
///
/// Paths may be written differently on either side, so a suffix on a path
/// boundary counts as a match. This can over-count when distinct files share
/// a suffix.
fn paths_match(key: &str, file: &str) -> bool {
    key == file || key.ends_with(&format!("/{file}")) || file.ends_with(&format!("/{key}"))
}

/// Total importers of `files` in the reverse adjacency of `graph`
pub fn blast_radius(graph: &DependencyGraph, files: &[String]) -> usize {
    let files: Vec<String> = files
        .iter()
        .map(|f| normalize(f))
        .filter(|f| !f.is_empty())
        .collect();

    files
        .iter()
        .map(|file| {
            graph
                .reverse
                .iter()
                .filter(|(key, _)| paths_match(&normalize(key), file))
                .map(|(_, importers)| importers.len())
                .sum::<usize>()
        })
        .sum()
}

/// Scores tasks under one [`ClassifierConfig`]
#[derive(Debug, Clone)]
pub struct TaskClassifier {
    config: ClassifierConfig,
    test_pattern: Regex,
}

impl TaskClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let test_pattern = Regex::new(&config.test_pattern)?;
        Ok(Self {
            config,
            test_pattern,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Score one task, using `graph` (when given) for its blast radius
    pub fn classify(&self, task: &Task, graph: Option<&DependencyGraph>) -> TaskComplexityScore {
        let config = &self.config;
        let mut sum: u32 = 1;
        let mut factors = Vec::new();

        let file_count = task.files.len();
        if file_count >= config.many_files {
            sum += 2;
            factors.push(format!("{file_count} files (high)"));
        } else if file_count >= config.some_files {
            sum += 1;
            factors.push(format!("{file_count} files"));
        }

        if let Some(graph) = graph {
            let importers = blast_radius(graph, &task.files);
            if importers >= config.many_importers {
                sum += 2;
                factors.push(format!("high blast radius ({importers} importers)"));
            } else if importers >= config.some_importers {
                sum += 1;
                factors.push(format!("moderate blast radius ({importers} importers)"));
            }
        }

        if self.test_pattern.is_match(&task.action) || self.test_pattern.is_match(&task.verify) {
            sum += 1;
            factors.push("has tests".to_string());
        }

        if task.task_type.needs_human_judgement() {
            sum += 1;
            factors.push(format!("checkpoint ({})", task.task_type));
        }

        if task.action.chars().count() > config.long_action_chars {
            sum += 1;
            factors.push(format!("complex action (>{} chars)", config.long_action_chars));
        }

        TaskComplexityScore::from_sum(sum, factors, config.executor_agent.as_str())
    }
}

/// Score `task` under `config`.
///
/// Never fails: a configuration that cannot be compiled yields the
/// moderate fallback score with a factor naming the problem.
pub fn classify_task_with(
    config: &ClassifierConfig,
    task: &Task,
    graph: Option<&DependencyGraph>,
) -> TaskComplexityScore {
    match TaskClassifier::new(config.clone()) {
        Ok(classifier) => classifier.classify(task, graph),
        Err(e) => {
            log::warn!("Task classification for '{}' fell back: {e}", task.name);
            TaskComplexityScore::fallback(config.executor_agent.as_str(), e)
        }
    }
}

/// Score `task` with the default configuration
pub fn classify_task(task: &Task, graph: Option<&DependencyGraph>) -> TaskComplexityScore {
    classify_task_with(&ClassifierConfig::default(), task, graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{ComplexityLabel, ModelTier};
    use crate::task::TaskType;
    use pretty_assertions::assert_eq;

    fn files(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("src/f{i}.js")).collect()
    }

    #[test]
    fn test_trivial_task() {
        let score = classify_task(&Task::new("Rename", TaskType::Auto), None);
        assert_eq!(score.score, 1);
        assert_eq!(score.label, ComplexityLabel::Trivial);
        assert!(score.factors.is_empty());
        assert_eq!(score.recommended_agent, "executor");
    }

    #[test]
    fn test_many_files_with_tests() {
        let task = Task::new("Refactor", TaskType::Auto)
            .with_files(files(7))
            .with_action("Split the module, then run npm test");
        let score = classify_task(&task, None);
        assert_eq!(score.score, 4);
        assert_eq!(score.label, ComplexityLabel::Complex);
        assert_eq!(score.factors, vec!["7 files (high)", "has tests"]);
        assert_eq!(score.recommended_model, ModelTier::Opus);
    }

    #[test]
    fn test_file_thresholds() {
        let score = |n| classify_task(&Task::new("t", TaskType::Auto).with_files(files(n)), None).score;
        assert_eq!(score(2), 1);
        assert_eq!(score(3), 2);
        assert_eq!(score(5), 2);
        assert_eq!(score(6), 3);
    }

    #[test]
    fn test_test_idiom_in_verify_only() {
        let task = Task::new("t", TaskType::Auto).with_verify("pytest -q passes");
        assert_eq!(classify_task(&task, None).factors, vec!["has tests"]);

        let task = Task::new("t", TaskType::Auto).with_action("update the attestation docs");
        assert!(classify_task(&task, None).factors.is_empty());
    }

    #[test]
    fn test_checkpoints_and_long_action() {
        let task = Task::new("Pick a schema", TaskType::CheckpointDecision).with_action("x".repeat(801));
        let score = classify_task(&task, None);
        assert_eq!(score.score, 3);
        assert_eq!(
            score.factors,
            vec!["checkpoint (checkpoint:decision)", "complex action (>800 chars)"]
        );

        let other = Task::new("Review", TaskType::Checkpoint("review".into()));
        assert_eq!(classify_task(&other, None).score, 1);
    }

    #[test]
    fn test_blast_radius() {
        let graph = DependencyGraph::from_edges([
            ("src/a.js", "src/lib/util.js"),
            ("src/b.js", "src/lib/util.js"),
            ("src/c.js", "src/lib/util.js"),
            ("src/d.js", "src/lib/log.js"),
        ]);
        assert_eq!(blast_radius(&graph, &["lib/util.js".to_string()]), 3);
        assert_eq!(blast_radius(&graph, &["./src/lib/util.js".to_string()]), 3);
        assert_eq!(blast_radius(&graph, &["/repo/src/lib/log.js".to_string()]), 1);
        assert_eq!(blast_radius(&graph, &["til.js".to_string()]), 0);

        let task = Task::new("Touch util", TaskType::Auto).with_files(["lib/util.js"]);
        let score = classify_task(&task, Some(&graph));
        assert_eq!(score.score, 2);
        assert_eq!(score.factors, vec!["moderate blast radius (3 importers)"]);
    }

    #[test]
    fn test_invalid_pattern_falls_back() {
        let config = ClassifierConfig {
            test_pattern: "(".into(),
            ..Default::default()
        };
        let score = classify_task_with(&config, &Task::new("t", TaskType::Auto), None);
        assert_eq!(score.score, 3);
        assert_eq!(score.label, ComplexityLabel::Moderate);
        assert!(score.factors[0].starts_with("classification error"));
    }

    #[test]
    fn test_adding_a_file_never_lowers_score() {
        let mut previous = 0;
        for n in 0..10 {
            let task = Task::new("t", TaskType::Auto).with_files(files(n));
            let score = classify_task(&task, None).score;
            assert!(score >= previous);
            previous = score;
        }
    }
}
