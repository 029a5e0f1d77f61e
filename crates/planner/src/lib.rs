//! # Codeintel Planner
//!
//! Decides how planned work should run: scores each task 1-5 from its file
//! footprint, dependency-graph blast radius and content, then picks a
//! scheduling mode for a batch of plans and a model tier for each task.
//!
//! ## Architecture
//!
//! ```text
//! plan document
//!     │
//!     ├──> Frontmatter (serde_yaml) → wave, autonomous
//!     ├──> <task> blocks → Task[]
//!     │
//!     ├──> TaskClassifier (+ optional DependencyGraph)
//!     │      └─ TaskComplexityScore: score, label, factors, model, agent
//!     │
//!     ├──> PlanClassification (max score, highest model)
//!     │
//!     └──> Batch of plans
//!            ├─ select_execution_mode → single | sequential | parallel | pipeline
//!            └─ route_task → model tier + agent
//! ```
//!
//! Classification and mode selection never fail: configuration problems
//! degrade to a moderate score.
//!
//! ## Example
//!
//! ```rust
//! use codeintel_planner::{classify_task, ComplexityLabel, Task, TaskType};
//!
//! let task = Task::new("Split parser", TaskType::Auto)
//!     .with_files((0..7).map(|i| format!("src/parser/{i}.rs")))
//!     .with_action("Split the parser, then run cargo test");
//! let score = classify_task(&task, None);
//! assert_eq!(score.score, 4);
//! assert_eq!(score.label, ComplexityLabel::Complex);
//! ```

mod classify;
mod config;
mod error;
mod mode;
mod plan;
mod routing;
mod score;
mod task;

pub use classify::{blast_radius, classify_task, classify_task_with, TaskClassifier};
pub use config::{ClassifierConfig, DEFAULT_TEST_PATTERN};
pub use error::{PlannerError, Result};
pub use mode::{select_execution_mode, ExecutionMode, ExecutionModeDecision};
pub use plan::{
    classify_plan, classify_plan_with, parse_tasks_from_plan, read_plan_metadata, ClassifiedTask,
    PlanClassification, PlanMetadata,
};
pub use routing::{route_task, route_task_with, RouteDecision};
pub use score::{ComplexityLabel, ModelTier, TaskComplexityScore, FALLBACK_SCORE, MAX_SCORE, MIN_SCORE};
pub use task::{Task, TaskType};
