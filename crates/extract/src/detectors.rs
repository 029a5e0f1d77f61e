//! Regex-table signature detection for languages without a grammar.
//!
//! Each [`Detector`] pairs a multi-line signature pattern with a projection
//! that turns one match into a [`Signature`]. Accuracy is heuristic: a match
//! is a line that looks like a declaration, nothing more.

use crate::language::Language;
use crate::types::{Signature, SignatureKind};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Turns one pattern match into a signature, or rejects it
pub type Projection = fn(&Captures<'_>, usize) -> Option<Signature>;

/// Signature pattern plus projection for one language
pub struct Detector {
    pub language: Language,
    pattern: Regex,
    /// Capture group holding the declared name; its offset sets the line
    name_group: usize,
    project: Projection,
}

impl Detector {
    fn new(language: Language, pattern: &str, name_group: usize, project: Projection) -> Self {
        Self {
            language,
            pattern: Regex::new(pattern).expect("valid regex literal"),
            name_group,
            project,
        }
    }

    /// Run the detector over a whole file
    pub fn detect(&self, code: &str) -> Vec<Signature> {
        let lines = LineIndex::new(code);
        self.pattern
            .captures_iter(code)
            .filter_map(|caps| {
                let offset = caps
                    .get(self.name_group)
                    .map(|m| m.start())
                    .unwrap_or_else(|| caps.get(0).map_or(0, |m| m.start()));
                (self.project)(&caps, lines.line_of(offset))
            })
            .collect()
    }
}

/// Byte offset to 1-based line lookup
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }
}

const KEYWORDS: &[&str] = &[
    "return", "new", "else", "throw", "if", "for", "while", "switch", "catch", "case", "do",
    "try", "await", "yield",
];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

fn split_params(list: Option<&str>, pick: impl Fn(&str) -> Option<String>) -> Vec<String> {
    list.map(|list| {
        list.trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .filter_map(|param| pick(param.trim()))
            .filter(|param| !param.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn first_token(param: &str) -> Option<String> {
    param.split_whitespace().next().map(str::to_string)
}

fn last_token(param: &str) -> Option<String> {
    param.split_whitespace().last().map(str::to_string)
}

fn before_colon(param: &str) -> Option<String> {
    param.split(':').next().map(|p| p.trim().to_string())
}

fn project_python(caps: &Captures<'_>, line: usize) -> Option<Signature> {
    let params = split_params(caps.get(3).map(|m| m.as_str()), |p| {
        p.split([':', '=']).next().map(|p| p.trim().to_string())
    });
    Some(
        Signature::new(&caps[2], SignatureKind::Function, line)
            .with_params(params)
            .with_async(caps.get(1).is_some()),
    )
}

fn project_go(caps: &Captures<'_>, line: usize) -> Option<Signature> {
    let params = split_params(caps.get(2).map(|m| m.as_str()), first_token);
    Some(Signature::new(&caps[1], SignatureKind::Function, line).with_params(params))
}

fn project_rust(caps: &Captures<'_>, line: usize) -> Option<Signature> {
    let params = split_params(caps.get(3).map(|m| m.as_str()), |p| {
        before_colon(p).map(|p| p.trim_start_matches("mut ").trim().to_string())
    });
    Some(
        Signature::new(&caps[2], SignatureKind::Function, line)
            .with_params(params)
            .with_async(caps.get(1).is_some()),
    )
}

fn project_ruby(caps: &Captures<'_>, line: usize) -> Option<Signature> {
    let params = split_params(caps.get(2).map(|m| m.as_str()), |p| {
        p.split(['=', ':']).next().map(|p| p.trim().to_string())
    });
    Some(Signature::new(&caps[1], SignatureKind::Function, line).with_params(params))
}

fn project_elixir(caps: &Captures<'_>, line: usize) -> Option<Signature> {
    let params = split_params(caps.get(2).map(|m| m.as_str()), |p| {
        p.split("\\\\").next().map(|p| p.trim().to_string())
    });
    Some(Signature::new(&caps[1], SignatureKind::Function, line).with_params(params))
}

fn project_java(caps: &Captures<'_>, line: usize) -> Option<Signature> {
    let return_type = &caps[1];
    let name = &caps[2];
    if is_keyword(return_type) || is_keyword(name) {
        return None;
    }
    let params = split_params(caps.get(3).map(|m| m.as_str()), last_token);
    Some(Signature::new(name, SignatureKind::Function, line).with_params(params))
}

fn project_php(caps: &Captures<'_>, line: usize) -> Option<Signature> {
    let params = split_params(caps.get(2).map(|m| m.as_str()), |p| {
        let declared = p.split('=').next().unwrap_or("");
        last_token(declared).map(|p| p.trim_start_matches(['&', '.']).trim_start_matches('$').to_string())
    });
    Some(Signature::new(&caps[1], SignatureKind::Function, line).with_params(params))
}

static REGISTRY: Lazy<Vec<Detector>> = Lazy::new(|| {
    vec![
        Detector::new(
            Language::Python,
            r"(?m)^[ \t]*(async[ \t]+)?def[ \t]+(\w+)[ \t]*\(([^)]*)\)",
            2,
            project_python,
        ),
        Detector::new(
            Language::Go,
            r"(?m)^func[ \t]+(?:\([^)]*\)[ \t]*)?(\w+)[ \t]*(?:\[[^\]]*\])?\(([^)]*)\)",
            1,
            project_go,
        ),
        Detector::new(
            Language::Rust,
            r#"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?(?:const[ \t]+)?(async[ \t]+)?(?:unsafe[ \t]+)?(?:extern[ \t]+"[^"]*"[ \t]+)?fn[ \t]+(\w+)[ \t]*(?:<[^>]*>)?[ \t]*\(([^)]*)\)"#,
            2,
            project_rust,
        ),
        Detector::new(
            Language::Ruby,
            r"(?m)^[ \t]*def[ \t]+(?:self\.)?(\w+[?!=]?)[ \t]*(\([^)]*\))?",
            1,
            project_ruby,
        ),
        Detector::new(
            Language::Elixir,
            r"(?m)^[ \t]*defp?[ \t]+(\w+[?!]?)[ \t]*(\([^)]*\))?",
            1,
            project_elixir,
        ),
        Detector::new(
            Language::Java,
            r"(?m)^[ \t]*(?:(?:public|private|protected|static|final|abstract|synchronized)[ \t]+)*([\w<>\[\].?]+)[ \t]+(\w+)[ \t]*\(([^)]*)\)",
            2,
            project_java,
        ),
        Detector::new(
            Language::Php,
            r"(?m)^[ \t]*(?:(?:public|private|protected|static|final|abstract)[ \t]+)*function[ \t]+&?(\w+)[ \t]*\(([^)]*)\)",
            1,
            project_php,
        ),
    ]
});

/// Registered detector for a language, if any
pub fn detector_for(language: Language) -> Option<&'static Detector> {
    REGISTRY.iter().find(|detector| detector.language == language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn detect(language: Language, code: &str) -> Vec<Signature> {
        detector_for(language).unwrap().detect(code)
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(3), 2);
        assert_eq!(index.line_of(5), 3);
        assert_eq!(index.line_of(6), 4);
    }

    #[test]
    fn test_python() {
        let code = "import os\n\nasync def fetch(url: str, retries=3):\n    pass\n\nclass A:\n    def run(self, *args):\n        pass\n";
        let sigs = detect(Language::Python, code);
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[0].name, "fetch");
        assert_eq!(sigs[0].params, vec!["url", "retries"]);
        assert_eq!(sigs[0].line, 3);
        assert!(sigs[0].is_async);
        assert_eq!(sigs[1].params, vec!["self", "*args"]);
        assert_eq!(sigs[1].line, 7);
    }

    #[test]
    fn test_go() {
        let code = "package main\n\nfunc (s *Server) Start(addr string, port int) error {\n}\nfunc helper() {}\n";
        let sigs = detect(Language::Go, code);
        assert_eq!(sigs[0].name, "Start");
        assert_eq!(sigs[0].params, vec!["addr", "port"]);
        assert_eq!(sigs[1].name, "helper");
        assert!(sigs[1].params.is_empty());
    }

    #[test]
    fn test_rust() {
        let code = "pub async fn serve<T>(mut listener: T, config: &Config) -> Result<()> {\n}\n    fn private(&self) {}\n";
        let sigs = detect(Language::Rust, code);
        assert_eq!(sigs[0].name, "serve");
        assert_eq!(sigs[0].params, vec!["listener", "config"]);
        assert!(sigs[0].is_async);
        assert_eq!(sigs[1].params, vec!["&self"]);
        assert_eq!(sigs[1].line, 3);
    }

    #[test]
    fn test_ruby_and_elixir() {
        let ruby = detect(Language::Ruby, "class A\n  def valid?(x, y = 2)\n  end\n  def self.build\n  end\nend\n");
        assert_eq!(ruby[0].name, "valid?");
        assert_eq!(ruby[0].params, vec!["x", "y"]);
        assert_eq!(ruby[1].name, "build");

        let elixir = detect(Language::Elixir, "defmodule M do\n  def run(a, b \\\\ 1), do: a\n  defp helper, do: :ok\nend\n");
        assert_eq!(elixir.len(), 2);
        assert_eq!(elixir[0].params, vec!["a", "b"]);
        assert_eq!(elixir[1].name, "helper");
    }

    #[test]
    fn test_java_rejects_statements() {
        let code = "public class A {\n  public static int add(int a, int b) {\n    return sum(a, b);\n  }\n}\n";
        let sigs = detect(Language::Java, code);
        assert_eq!(sigs.len(), 1);
        assert_eq!(sigs[0].name, "add");
        assert_eq!(sigs[0].params, vec!["a", "b"]);
    }

    #[test]
    fn test_php() {
        let code = "<?php\nclass A {\n  public function save($item, array $opts = []) {}\n}\n";
        let sigs = detect(Language::Php, code);
        assert_eq!(sigs[0].name, "save");
        assert_eq!(sigs[0].params, vec!["item", "opts"]);
    }

    #[test]
    fn test_no_detector() {
        assert!(detector_for(Language::JavaScript).is_none());
        assert!(detector_for(Language::Unknown).is_none());
    }
}
