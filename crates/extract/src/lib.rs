//! # Codeintel Extract
//!
//! Per-file structural extraction for codebase intelligence: declared
//! signatures, export surfaces, complexity scores, and a token-budgeted map
//! of the whole repository.
//!
//! ## Architecture
//!
//! ```text
//! (path, language, content)
//!     │
//!     ├──> JavaScript family
//!     │    ├─> Tree-sitter parse (TS/TSX grammar, then stripped JS)
//!     │    ├─> Declaration walk → signatures + function bodies
//!     │    ├─> Export walk + legacy `module.exports` scan
//!     │    └─> Line patterns when no grammar accepts the file
//!     │
//!     ├──> Other languages
//!     │    └─> Detector table (regex + projection per language)
//!     │
//!     └──> Repo map
//!          ├─> Parallel per-file extraction (rayon)
//!          ├─> Rank by signature count
//!          └─> Render sections within the character budget
//! ```
//!
//! No function in this crate returns an error for bad input. Reports carry
//! an optional [`ErrorTag`] alongside whatever could still be extracted.
//!
//! ## Example
//!
//! ```rust
//! use codeintel_extract::{extract_signatures, Language};
//!
//! let report = extract_signatures("math.js", Language::JavaScript, "function add(a, b) { return a + b; }");
//! assert_eq!(report.signatures[0].name, "add");
//! assert_eq!(report.signatures[0].params, vec!["a", "b"]);
//! ```

mod ast;
mod cache;
mod complexity;
mod config;
mod detectors;
mod error;
mod fallback;
mod language;
mod repo_map;
mod signatures;
mod source;
mod strip;
mod types;

pub use cache::{CacheStats, SignatureCache};
pub use complexity::{approximate_complexity, compute_complexity, MODULE_ENTRY};
pub use config::ExtractConfig;
pub use detectors::{detector_for, Detector, Projection};
pub use error::{ErrorTag, ExtractError, Result};
pub use fallback::{scan_js_signatures, scan_legacy_exports};
pub use language::Language;
pub use repo_map::{generate_repo_map, RepoMapper};
pub use signatures::{
    extract_exports, extract_file_exports, extract_file_signatures, extract_signatures, read_source,
};
pub use source::{FsReader, SourceReader};
pub use strip::strip_type_syntax;
pub use types::{
    estimate_tokens, ComplexityReport, ExportReport, ExportSurface, FunctionComplexity,
    ModuleKind, RepoMap, Signature, SignatureKind, SignatureReport, SourceFile,
};
