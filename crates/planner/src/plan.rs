use crate::classify::TaskClassifier;
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::score::{ModelTier, TaskComplexityScore};
use crate::task::{Task, TaskType};
use codeintel_graph::DependencyGraph;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect("valid regex literal"));
    };
}

pattern!(TASK_BLOCK, r#"<task\s+type="([^"]*)"[^>]*>([\s\S]*?)</task>"#);
pattern!(NAME, r"(?is)<name>(.*?)</name>");
pattern!(FILES, r"(?is)<files>(.*?)</files>");
pattern!(ACTION, r"(?is)<action>(.*?)</action>");
pattern!(VERIFY, r"(?is)<verify>(.*?)</verify>");
pattern!(DONE, r"(?is)<done>(.*?)</done>");
pattern!(FRONTMATTER, r"(?s)\A---\r?\n(.+?)\r?\n---");

const UNNAMED_TASK: &str = "Unnamed Task";

fn element(body: &str, re: &Regex) -> Option<String> {
    re.captures(body).map(|c| c[1].trim().to_string())
}

/// Extract `<task type="...">` blocks from plan text, in document order
pub fn parse_tasks_from_plan(content: &str) -> Vec<Task> {
    TASK_BLOCK
        .captures_iter(content)
        .map(|caps| {
            let body = &caps[2];
            Task {
                name: element(body, &NAME)
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| UNNAMED_TASK.to_string()),
                task_type: TaskType::parse(&caps[1]),
                files: element(body, &FILES)
                    .map(|list| {
                        list.split(',')
                            .map(str::trim)
                            .filter(|f| !f.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
                action: element(body, &ACTION).unwrap_or_default(),
                verify: element(body, &VERIFY).unwrap_or_default(),
                done: element(body, &DONE).unwrap_or_default(),
            }
        })
        .collect()
}

/// Scheduling metadata from a plan's YAML frontmatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMetadata {
    /// Declared wave, 1 when absent or not a positive integer
    pub wave: u32,
    pub autonomous: bool,
}

impl Default for PlanMetadata {
    fn default() -> Self {
        Self {
            wave: 1,
            autonomous: false,
        }
    }
}

fn parse_frontmatter(content: &str) -> Result<Option<Value>> {
    let Some(caps) = FRONTMATTER.captures(content) else {
        if content.starts_with("---") {
            log::debug!("Plan starts with '---' but has no closed frontmatter block");
        }
        return Ok(None);
    };
    Ok(Some(serde_yaml::from_str(&caps[1])?))
}

fn wave_of(value: Option<&Value>) -> u32 {
    let wave = match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    };
    wave.filter(|w| *w > 0).unwrap_or(1)
}

fn flag_of(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim() == "true",
        _ => false,
    }
}

/// Read `wave` and `autonomous` from the frontmatter of a plan.
///
/// Missing or malformed frontmatter yields the defaults (wave 1, not
/// autonomous).
pub fn read_plan_metadata(content: &str) -> PlanMetadata {
    match parse_frontmatter(content) {
        Ok(Some(front)) => PlanMetadata {
            wave: wave_of(front.get("wave")),
            autonomous: flag_of(front.get("autonomous")),
        },
        Ok(None) => PlanMetadata::default(),
        Err(e) => {
            log::debug!("Ignoring plan frontmatter: {e}");
            PlanMetadata::default()
        }
    }
}

/// A task together with its score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedTask {
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub files: Vec<String>,
    pub complexity: TaskComplexityScore,
}

/// Scores for every task of one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanClassification {
    pub plan: String,
    pub wave: u32,
    pub autonomous: bool,
    pub task_count: usize,
    pub tasks: Vec<ClassifiedTask>,
    /// Highest task score, 1 for a plan without tasks
    pub plan_complexity: u8,
    /// Highest-priority model any task asks for
    pub recommended_model: ModelTier,
}

impl PlanClassification {
    pub fn from_scored(
        plan: impl Into<String>,
        metadata: PlanMetadata,
        tasks: Vec<(Task, TaskComplexityScore)>,
    ) -> Self {
        let tasks: Vec<ClassifiedTask> = tasks
            .into_iter()
            .map(|(task, complexity)| ClassifiedTask {
                name: task.name,
                task_type: task.task_type,
                files: task.files,
                complexity,
            })
            .collect();

        let plan_complexity = tasks.iter().map(|t| t.complexity.score).max().unwrap_or(1);
        let recommended_model = tasks
            .iter()
            .map(|t| t.complexity.recommended_model)
            .fold(ModelTier::Sonnet, |best, model| {
                if model.priority() > best.priority() {
                    model
                } else {
                    best
                }
            });

        Self {
            plan: plan.into(),
            wave: metadata.wave,
            autonomous: metadata.autonomous,
            task_count: tasks.len(),
            tasks,
            plan_complexity,
            recommended_model,
        }
    }

    /// Classify `tasks` with `classifier`
    pub fn from_tasks(
        plan: impl Into<String>,
        metadata: PlanMetadata,
        tasks: Vec<Task>,
        classifier: &TaskClassifier,
        graph: Option<&DependencyGraph>,
    ) -> Self {
        let scored = tasks
            .into_iter()
            .map(|task| {
                let score = classifier.classify(&task, graph);
                (task, score)
            })
            .collect();
        Self::from_scored(plan, metadata, scored)
    }

    /// Parse a plan document and classify its tasks with `classifier`
    pub fn from_plan(
        plan: impl Into<String>,
        content: &str,
        classifier: &TaskClassifier,
        graph: Option<&DependencyGraph>,
    ) -> Self {
        let metadata = read_plan_metadata(content);
        Self::from_tasks(plan, metadata, parse_tasks_from_plan(content), classifier, graph)
    }

    pub fn has_checkpoints(&self) -> bool {
        self.tasks.iter().any(|t| t.task_type.is_checkpoint())
    }
}

/// Parse and classify one plan document under `config`.
///
/// Never fails: if the configuration cannot be compiled every task gets
/// the moderate fallback score.
pub fn classify_plan_with(
    config: &ClassifierConfig,
    plan: &str,
    content: &str,
    graph: Option<&DependencyGraph>,
) -> PlanClassification {
    match TaskClassifier::new(config.clone()) {
        Ok(classifier) => PlanClassification::from_plan(plan, content, &classifier, graph),
        Err(e) => {
            log::warn!("Plan {plan} classified with fallback scores: {e}");
            let metadata = read_plan_metadata(content);
            let scored = parse_tasks_from_plan(content)
                .into_iter()
                .map(|task| (task, TaskComplexityScore::fallback(config.executor_agent.as_str(), &e)))
                .collect();
            PlanClassification::from_scored(plan, metadata, scored)
        }
    }
}

/// Parse and classify one plan document with the default configuration
pub fn classify_plan(plan: &str, content: &str, graph: Option<&DependencyGraph>) -> PlanClassification {
    classify_plan_with(&ClassifierConfig::default(), plan, content, graph)
}
