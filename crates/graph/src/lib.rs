//! # Codeintel Graph
//!
//! File-level dependency graph for a source tree: who imports whom, which
//! files form import cycles, and how far a change to one file ripples out.
//!
//! ## Architecture
//!
//! ```text
//! SourceFile[] + SourceReader
//!     │
//!     ├──> Graph Builder (rayon, one task per file)
//!     │      ├─ Extract raw import specifiers (per-language regex)
//!     │      └─ Resolve against the project file set
//!     │
//!     ├──> Merge (calling thread, input order)
//!     │      └─ forward / reverse adjacency + build stats
//!     │
//!     └──> Queries over an immutable snapshot
//!            ├─ Cycles: iterative Tarjan SCC over petgraph
//!            ├─ Impact: depth-capped BFS over reverse edges
//!            └─ Digest: fan-in ranking for compact context
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codeintel_graph::{find_cycles, transitive_dependents, DependencyGraph};
//!
//! // c imports b, b imports a
//! let graph = DependencyGraph::from_edges([("b", "a"), ("c", "b")]);
//! let impact = transitive_dependents(&graph, "a", 10);
//! assert_eq!(impact.direct_dependents, vec!["b"]);
//! assert_eq!(impact.fan_in, 2);
//! assert_eq!(find_cycles(&graph).cycle_count, 0);
//! ```

mod builder;
mod config;
mod cycles;
mod digest;
mod error;
mod handle;
mod impact;
mod imports;
mod resolve;
mod types;

pub use builder::{build_dependency_graph, parse_imports, GraphBuilder};
pub use config::GraphConfig;
pub use cycles::{find_cycles, CycleReport};
pub use digest::{top_dependents, FanIn, GraphDigest};
pub use error::{GraphError, Result};
pub use handle::GraphHandle;
pub use impact::{impact_many, transitive_dependents, ImpactReport, TransitiveDependent, DEFAULT_MAX_DEPTH};
pub use imports::extract_imports;
pub use resolve::{resolve_import, FileSet};
pub use types::{Adjacency, DependencyGraph, GraphStats, ImportEdge};
