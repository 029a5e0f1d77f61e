//! # Codeintel
//!
//! Codebase intelligence for automated planning: per-file signatures and
//! complexity, a token-budgeted repo map, a dependency graph with cycle and
//! impact queries, and task classification that decides how planned work is
//! scheduled and routed.
//!
//! ## Architecture
//!
//! ```text
//! IntelConfig (TOML/JSON)
//!     │
//!     └──> Engine
//!            ├─ SourceReader ──> codeintel-extract
//!            │                     ├─ signatures / exports (SignatureCache)
//!            │                     ├─ complexity
//!            │                     └─ repo map
//!            ├─ GraphHandle ───> codeintel-graph
//!            │                     ├─ build (rayon) → snapshot swap
//!            │                     ├─ cycles, impact, digest
//!            └─ TaskClassifier ─> codeintel-planner
//!                                  ├─ task / plan scores (blast radius from the graph)
//!                                  ├─ execution mode
//!                                  └─ routing
//! ```
//!
//! Every stage is also usable on its own through the free functions
//! re-exported here.
//!
//! ## Example
//!
//! ```rust
//! use codeintel::{Engine, IntelConfig, SourceFile};
//! use std::collections::HashMap;
//!
//! let mut files = HashMap::new();
//! files.insert("src/app.js".to_string(), "import { add } from './math';\n".to_string());
//! files.insert("src/math.js".to_string(), "export function add(a, b) { return a + b; }\n".to_string());
//!
//! let engine = Engine::new(IntelConfig::default(), Box::new(files)).unwrap();
//! let sources = vec![SourceFile::from_path("src/app.js"), SourceFile::from_path("src/math.js")];
//! engine.build_graph(&sources);
//!
//! assert_eq!(engine.impact("src/math.js", None).direct_dependents, vec!["src/app.js"]);
//! assert_eq!(engine.signatures(&sources[1]).signatures[0].name, "add");
//! ```

mod config;
mod engine;
mod error;

pub use config::IntelConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};

pub use codeintel_extract::{
    compute_complexity, estimate_tokens, extract_exports, extract_signatures, generate_repo_map,
    ComplexityReport, ErrorTag, ExportReport, ExportSurface, ExtractConfig, FsReader,
    FunctionComplexity, Language, ModuleKind, RepoMap, Signature, SignatureCache, SignatureKind,
    SignatureReport, SourceFile, SourceReader,
};
pub use codeintel_graph::{
    build_dependency_graph, find_cycles, impact_many, top_dependents, transitive_dependents,
    CycleReport, DependencyGraph, FanIn, GraphConfig, GraphDigest, GraphHandle, GraphStats,
    ImpactReport, ImportEdge, TransitiveDependent,
};
pub use codeintel_planner::{
    classify_plan, classify_task, parse_tasks_from_plan, read_plan_metadata, route_task,
    select_execution_mode, ClassifierConfig, ComplexityLabel, ExecutionMode,
    ExecutionModeDecision, ModelTier, PlanClassification, PlanMetadata, RouteDecision, Task,
    TaskComplexityScore, TaskType,
};
