//! Raw import extraction.
//!
//! Each language gets its own comment-stripping, regex-based scanner. The
//! scanners return specifiers exactly as written in the source; turning them
//! into project files is the job of [`crate::resolve`].

use codeintel_extract::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect("valid regex literal"));
    };
}

pattern!(BLOCK_COMMENT, r"(?s)/\*.*?\*/");
pattern!(SLASH_COMMENT, r"//[^\n]*");
pattern!(HASH_COMMENT, r"#[^\n]*");

pattern!(JS_REQUIRE, r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#);
pattern!(JS_FROM, r#"\b(?:import|export)\s+[\s\S]*?\s+from\s+['"]([^'"]+)['"]"#);
pattern!(JS_SIDE_EFFECT, r#"\bimport\s+['"]([^'"]+)['"]"#);
pattern!(JS_DYNAMIC, r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#);

pattern!(PY_FROM, r"(?m)^\s*from\s+(\.{0,3}[\w.]*)\s+import\b");
pattern!(PY_IMPORT, r"(?m)^\s*import\s+([\w.]+(?:\s*,\s*[\w.]+)*)");

pattern!(GO_SINGLE, r#"\bimport\s+(?:[\w.]+\s+)?"([^"]+)""#);
pattern!(GO_GROUP, r"\bimport\s*\(([^)]*)\)");
pattern!(GO_PATH, r#""([^"]+)""#);

pattern!(EX_DIRECTIVE, r"(?m)^\s*(?:alias|import|use|require)\s+([A-Z][\w.]*)");
pattern!(EX_MULTI_ALIAS, r"(?m)^\s*alias\s+([A-Z][\w.]*)\.\{([^}]+)\}");

pattern!(RS_USE, r"\buse\s+([\w:]+(?:::[\w:{}*,\s]+)?)");
pattern!(RS_MOD, r"\bmod\s+(\w+)\s*;");
pattern!(RS_EXTERN, r"\bextern\s+crate\s+(\w+)");

fn strip_c_comments(content: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(content, "");
    SLASH_COMMENT.replace_all(&without_blocks, "").into_owned()
}

fn captures(re: &Regex, text: &str, out: &mut Vec<String>) {
    out.extend(re.captures_iter(text).map(|c| c[1].to_string()));
}

fn dedup(specifiers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(specifiers.len());
    specifiers
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

fn javascript(content: &str) -> Vec<String> {
    let code = strip_c_comments(content);
    let mut out = Vec::new();
    captures(&JS_REQUIRE, &code, &mut out);
    captures(&JS_FROM, &code, &mut out);
    captures(&JS_SIDE_EFFECT, &code, &mut out);
    captures(&JS_DYNAMIC, &code, &mut out);
    out
}

fn python(content: &str) -> Vec<String> {
    let code = HASH_COMMENT.replace_all(content, "");
    let mut out = Vec::new();
    captures(&PY_FROM, &code, &mut out);
    for caps in PY_IMPORT.captures_iter(&code) {
        out.extend(
            caps[1]
                .split(',')
                .filter_map(|module| module.split_whitespace().next())
                .map(str::to_string),
        );
    }
    out
}

fn go(content: &str) -> Vec<String> {
    let code = strip_c_comments(content);
    let mut out = Vec::new();
    captures(&GO_SINGLE, &code, &mut out);
    for group in GO_GROUP.captures_iter(&code) {
        captures(&GO_PATH, &group[1], &mut out);
    }
    out
}

fn elixir(content: &str) -> Vec<String> {
    let code = HASH_COMMENT.replace_all(content, "");
    let mut out: Vec<String> = EX_DIRECTIVE
        .captures_iter(&code)
        .map(|c| c[1].trim_end_matches('.').to_string())
        .collect();
    for caps in EX_MULTI_ALIAS.captures_iter(&code) {
        let base = &caps[1];
        out.extend(
            caps[2]
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| format!("{base}.{part}")),
        );
    }
    out
}

fn rust(content: &str) -> Vec<String> {
    let code = strip_c_comments(content);
    let mut out: Vec<String> = RS_USE
        .captures_iter(&code)
        .map(|c| {
            let path = c[1].split('{').next().unwrap_or_default();
            path.trim_end_matches("::").trim().to_string()
        })
        .collect();
    captures(&RS_MOD, &code, &mut out);
    captures(&RS_EXTERN, &code, &mut out);
    out
}

/// Extract the distinct raw import specifiers of one file, in source order
/// per statement shape.
///
/// Languages without an import scanner yield an empty list.
pub fn extract_imports(language: Language, content: &str) -> Vec<String> {
    let raw = match language {
        Language::JavaScript | Language::TypeScript => javascript(content),
        Language::Python => python(content),
        Language::Go => go(content),
        Language::Elixir => elixir(content),
        Language::Rust => rust(content),
        _ => return Vec::new(),
    };
    dedup(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_javascript_imports() {
        let code = r#"
const fs = require('fs');
const util = require("./util");
import { a, b } from './ab';
import Default from "../lib/default";
export * from './reexport';
import './side-effect.css';
const lazy = await import('./lazy');
// require('./commented')
/* import x from './blocked'; */
const again = require('./util');
"#;
        assert_eq!(
            extract_imports(Language::JavaScript, code),
            vec![
                "fs",
                "./util",
                "./ab",
                "../lib/default",
                "./reexport",
                "./side-effect.css",
                "./lazy",
            ]
        );
    }

    #[test]
    fn test_multiline_import() {
        let code = "import {\n  one,\n  two,\n} from './many';\n";
        assert_eq!(extract_imports(Language::TypeScript, code), vec!["./many"]);
    }

    #[test]
    fn test_python_imports() {
        let code = "import os, sys\nimport numpy as np\nfrom . import sibling\nfrom ..pkg.mod import thing\nfrom app.models import User  # comment\n# import hidden\n";
        assert_eq!(
            extract_imports(Language::Python, code),
            vec![".", "..pkg.mod", "app.models", "os", "sys", "numpy"]
        );
    }

    #[test]
    fn test_go_imports() {
        let code = "package main\n\nimport \"fmt\"\nimport (\n\t\"os\"\n\tstore \"example.com/app/internal/store\"\n)\n// import \"hidden\"\n";
        assert_eq!(
            extract_imports(Language::Go, code),
            vec!["fmt", "os", "example.com/app/internal/store"]
        );
    }

    #[test]
    fn test_elixir_imports() {
        let code = "defmodule MyApp.Web do\n  alias MyApp.Accounts.User\n  import Ecto.Query\n  use GenServer\n  alias MyApp.{Repo, Mailer}\n  # alias Hidden.Module\nend\n";
        assert_eq!(
            extract_imports(Language::Elixir, code),
            vec![
                "MyApp.Accounts.User",
                "Ecto.Query",
                "GenServer",
                "MyApp",
                "MyApp.Repo",
                "MyApp.Mailer",
            ]
        );
    }

    #[test]
    fn test_rust_imports() {
        let code = "use std::collections::HashMap;\nuse crate::graph::{Node, Edge};\nuse super::error::Result;\nmod cycles;\npub mod impact;\nextern crate serde;\n// use crate::hidden;\n";
        assert_eq!(
            extract_imports(Language::Rust, code),
            vec![
                "std::collections::HashMap",
                "crate::graph",
                "super::error::Result",
                "cycles",
                "impact",
                "serde",
            ]
        );
    }

    #[test]
    fn test_unsupported_language() {
        assert!(extract_imports(Language::Ruby, "require 'json'").is_empty());
    }
}
