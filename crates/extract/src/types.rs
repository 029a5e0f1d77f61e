use crate::error::ErrorTag;
use crate::language::Language;
use serde::{Deserialize, Serialize};

/// One file under analysis. Content is read on demand through a
/// [`SourceReader`](crate::SourceReader) and never held here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    /// Project-relative path
    pub path: String,
    pub language: Language,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, language: Language) -> Self {
        Self {
            path: path.into(),
            language,
        }
    }

    /// Build a source file whose language is inferred from its extension
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let language = Language::from_path(&path);
        Self { path, language }
    }
}

/// Kind of a declared callable or type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureKind {
    Function,
    Class,
    Method,
    Arrow,
}

impl SignatureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureKind::Function => "function",
            SignatureKind::Class => "class",
            SignatureKind::Method => "method",
            SignatureKind::Arrow => "arrow",
        }
    }
}

/// A declared callable or type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Declared name; methods are qualified as `Class.method`
    pub name: String,
    /// Parameter names in declaration order
    pub params: Vec<String>,
    /// 1-based declaration line
    pub line: usize,
    #[serde(rename = "type")]
    pub kind: SignatureKind,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(default)]
    pub generator: bool,
}

impl Signature {
    pub fn new(name: impl Into<String>, kind: SignatureKind, line: usize) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            line,
            kind,
            is_async: false,
            generator: false,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: bool) -> Self {
        self.generator = generator;
        self
    }
}

/// Module system inferred from which export sets are populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Esm,
    Cjs,
    Mixed,
}

impl ModuleKind {
    /// ESM-only is `esm`, both is `mixed`, everything else (including
    /// nothing exported at all) is `cjs`.
    pub fn infer(has_esm: bool, has_cjs: bool) -> Self {
        match (has_esm, has_cjs) {
            (true, true) => ModuleKind::Mixed,
            (true, false) => ModuleKind::Esm,
            _ => ModuleKind::Cjs,
        }
    }
}

/// What a JavaScript-family module exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSurface {
    pub named: Vec<String>,
    #[serde(rename = "default")]
    pub default: Option<String>,
    pub re_exports: Vec<String>,
    pub cjs_exports: Vec<String>,
    #[serde(rename = "type")]
    pub kind: ModuleKind,
}

impl Default for ExportSurface {
    fn default() -> Self {
        Self {
            named: Vec::new(),
            default: None,
            re_exports: Vec::new(),
            cjs_exports: Vec::new(),
            kind: ModuleKind::Cjs,
        }
    }
}

impl ExportSurface {
    /// Labels shown in the repo map: named, then legacy, then `default:<name>`
    pub fn export_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .named
            .iter()
            .chain(self.cjs_exports.iter())
            .cloned()
            .collect();
        if let Some(default) = &self.default {
            names.push(format!("default:{default}"));
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
            && self.default.is_none()
            && self.re_exports.is_empty()
            && self.cjs_exports.is_empty()
    }
}

/// Result of signature extraction for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureReport {
    pub language: Language,
    pub signatures: Vec<Signature>,
    /// Present only for grammar-parsed languages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_surface: Option<ExportSurface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorTag>,
}

impl SignatureReport {
    pub fn failed(language: Language, tag: ErrorTag) -> Self {
        Self {
            language,
            signatures: Vec::new(),
            export_surface: None,
            error: Some(tag),
        }
    }
}

/// Result of export extraction for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    pub language: Language,
    pub surface: ExportSurface,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorTag>,
}

/// Complexity of one function body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionComplexity {
    pub name: String,
    pub line: usize,
    pub complexity: usize,
    pub nesting_max: usize,
}

/// Result of complexity scoring for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub file: String,
    pub module_complexity: usize,
    pub functions: Vec<FunctionComplexity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorTag>,
}

impl ComplexityReport {
    pub fn failed(path: impl Into<String>, tag: ErrorTag) -> Self {
        Self {
            file: path.into(),
            module_complexity: 0,
            functions: Vec::new(),
            error: Some(tag),
        }
    }
}

/// Token-budgeted textual overview of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMap {
    pub summary: String,
    pub files_included: usize,
    pub total_signatures: usize,
    pub token_estimate: usize,
}

/// Estimate token count for text (≈4 chars per token, rounded up)
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}
