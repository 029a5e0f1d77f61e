use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared execution category of a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    #[default]
    Auto,
    /// `checkpoint:decision`
    CheckpointDecision,
    /// `checkpoint:human-verify`
    CheckpointHumanVerify,
    /// Any other `checkpoint:<kind>`
    Checkpoint(String),
    Other(String),
}

impl TaskType {
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "" | "auto" => TaskType::Auto,
            "checkpoint:decision" => TaskType::CheckpointDecision,
            "checkpoint:human-verify" => TaskType::CheckpointHumanVerify,
            other => match other.strip_prefix("checkpoint:") {
                Some(kind) => TaskType::Checkpoint(kind.to_string()),
                None => TaskType::Other(other.to_string()),
            },
        }
    }

    /// Needs a human before execution can continue
    pub fn is_checkpoint(&self) -> bool {
        matches!(
            self,
            TaskType::CheckpointDecision | TaskType::CheckpointHumanVerify | TaskType::Checkpoint(_)
        )
    }

    /// Checkpoints that add to a task's complexity score
    pub fn needs_human_judgement(&self) -> bool {
        matches!(self, TaskType::CheckpointDecision | TaskType::CheckpointHumanVerify)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Auto => f.write_str("auto"),
            TaskType::CheckpointDecision => f.write_str("checkpoint:decision"),
            TaskType::CheckpointHumanVerify => f.write_str("checkpoint:human-verify"),
            TaskType::Checkpoint(kind) => write!(f, "checkpoint:{kind}"),
            TaskType::Other(tag) => f.write_str(tag),
        }
    }
}

impl From<String> for TaskType {
    fn from(tag: String) -> Self {
        TaskType::parse(&tag)
    }
}

impl From<TaskType> for String {
    fn from(task_type: TaskType) -> Self {
        task_type.to_string()
    }
}

/// One unit of planned work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub verify: String,
    #[serde(default)]
    pub done: String,
}

impl Task {
    pub fn new(name: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            name: name.into(),
            task_type,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    #[must_use]
    pub fn with_verify(mut self, verify: impl Into<String>) -> Self {
        self.verify = verify.into();
        self
    }
}
