use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Language tag attached to a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Go,
    Rust,
    Ruby,
    Elixir,
    Java,
    Php,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "py" | "pyi" => Language::Python,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "rb" => Language::Ruby,
            "ex" | "exs" => Language::Elixir,
            "java" => Language::Java,
            "php" => Language::Php,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Parse a caller-declared language tag ("javascript", "ts", ...)
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "javascript" | "js" | "jsx" => Language::JavaScript,
            "typescript" | "ts" | "tsx" => Language::TypeScript,
            "python" | "py" => Language::Python,
            "go" | "golang" => Language::Go,
            "rust" | "rs" => Language::Rust,
            "ruby" | "rb" => Language::Ruby,
            "elixir" | "ex" => Language::Elixir,
            "java" => Language::Java,
            "php" => Language::Php,
            _ => Language::Unknown,
        }
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Elixir => "elixir",
            Language::Java => "java",
            Language::Php => "php",
            Language::Unknown => "unknown",
        }
    }

    /// JavaScript and its typed superset share one grammar-driven pipeline
    pub fn is_js_family(self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript)
    }

    /// Check if this language is parsed with a real grammar
    pub fn has_grammar(self) -> bool {
        self.is_js_family()
    }

    /// Check if raw import specifiers can be extracted for this language
    pub fn has_import_parser(self) -> bool {
        matches!(
            self,
            Language::JavaScript
                | Language::TypeScript
                | Language::Python
                | Language::Go
                | Language::Elixir
                | Language::Rust
        )
    }

    pub fn is_known(self) -> bool {
        self != Language::Unknown
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("js"), Language::JavaScript);
        assert_eq!(Language::from_extension("MJS"), Language::JavaScript);
        assert_eq!(Language::from_extension("tsx"), Language::TypeScript);
        assert_eq!(Language::from_extension("exs"), Language::Elixir);
        assert_eq!(Language::from_extension("md"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/lib.rs"), Language::Rust);
        assert_eq!(Language::from_path("pkg/server.go"), Language::Go);
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Language::from_tag("TypeScript"), Language::TypeScript);
        assert_eq!(Language::from_tag("golang"), Language::Go);
        assert_eq!(Language::from_tag("cobol"), Language::Unknown);
    }

    #[test]
    fn test_capabilities() {
        assert!(Language::TypeScript.has_grammar());
        assert!(!Language::Python.has_grammar());
        assert!(Language::Elixir.has_import_parser());
        assert!(!Language::Java.has_import_parser());
        assert!(!Language::Unknown.is_known());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
    }
}
