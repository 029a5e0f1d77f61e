//! Import resolution.
//!
//! A resolver turns a raw specifier into a file from the caller's project
//! file set. Each language tries an ordered list of candidate paths and
//! returns the first one present; anything that looks like an external
//! dependency stays unresolved.

use codeintel_extract::Language;
use std::collections::BTreeSet;

/// Set of project-relative file paths, `/`-separated
pub type FileSet = BTreeSet<String>;

const JS_SUFFIXES: &[&str] = &[
    "",
    ".js",
    ".ts",
    ".tsx",
    ".jsx",
    ".cjs",
    ".mjs",
    "/index.js",
    "/index.ts",
    "/index.tsx",
];

const RUST_ROOT_FILES: &[&str] = &["lib.rs", "main.rs", "mod.rs"];

/// Directory part of a `/`-separated path; empty at the project root
fn parent(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Join `rel` onto `base`, folding `.` and `..` segments
fn join(base: &str, rel: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(rel.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn first_present(candidates: impl IntoIterator<Item = String>, files: &FileSet) -> Option<String> {
    candidates.into_iter().find(|candidate| files.contains(candidate))
}

fn resolve_javascript(raw: &str, from: &str, files: &FileSet) -> Option<String> {
    if !raw.starts_with('.') {
        return None;
    }
    let base = join(parent(from), raw);
    first_present(JS_SUFFIXES.iter().map(|suffix| format!("{base}{suffix}")), files)
}

fn resolve_python(raw: &str, from: &str, files: &FileSet) -> Option<String> {
    let module = if raw.starts_with('.') {
        let dots = raw.len() - raw.trim_start_matches('.').len();
        let mut base = parent(from);
        for _ in 1..dots {
            base = parent(base);
        }
        join(base, &raw[dots..].replace('.', "/"))
    } else {
        raw.replace('.', "/")
    };

    let candidates = if module.is_empty() {
        vec!["__init__.py".to_string()]
    } else {
        vec![
            format!("{module}.py"),
            format!("{module}/__init__.py"),
            format!("{module}.pyi"),
        ]
    };
    first_present(candidates, files)
}

/// `MyApp.Accounts` → `my_app/accounts`
fn elixir_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| {
            let mut snake = String::with_capacity(part.len() + 4);
            for (i, ch) in part.chars().enumerate() {
                if ch.is_ascii_uppercase() {
                    if i > 0 {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                } else {
                    snake.push(ch);
                }
            }
            snake
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn resolve_elixir(raw: &str, files: &FileSet) -> Option<String> {
    let parts: Vec<&str> = raw.split('.').filter(|p| !p.is_empty()).collect();
    let bases = [elixir_path(&parts), elixir_path(parts.get(1..).unwrap_or_default())];

    let candidates = bases
        .iter()
        .filter(|base| !base.is_empty())
        .flat_map(|base| {
            [
                format!("lib/{base}.ex"),
                format!("{base}.ex"),
                format!("lib/{base}/index.ex"),
            ]
        });
    first_present(candidates, files)
}

fn resolve_go(raw: &str, files: &FileSet) -> Option<String> {
    let package = raw.rsplit('/').next().filter(|p| !p.is_empty())?;

    let mut fallback = None;
    for file in files {
        if !file.ends_with(".go") || file.ends_with("_test.go") {
            continue;
        }
        let dir = parent(file);
        let dir_name = dir.rsplit('/').next().unwrap_or(dir);
        if dir_name != package {
            continue;
        }
        if raw == dir || raw.ends_with(&format!("/{dir}")) {
            return Some(file.clone());
        }
        fallback.get_or_insert_with(|| file.clone());
    }
    fallback
}

/// Directory holding the crate root of `from`: the nearest enclosing `src`
fn rust_crate_root(from: &str) -> String {
    let mut dir = parent(from);
    loop {
        if dir == "src" || dir.ends_with("/src") {
            return dir.to_string();
        }
        if dir.is_empty() {
            return "src".to_string();
        }
        dir = parent(dir);
    }
}

/// Directory in which child modules of `from` live
fn rust_module_dir(from: &str) -> String {
    let dir = parent(from);
    let file = from.rsplit('/').next().unwrap_or(from);
    if RUST_ROOT_FILES.contains(&file) {
        return dir.to_string();
    }
    let stem = file.trim_end_matches(".rs");
    join(dir, stem)
}

fn resolve_rust(raw: &str, from: &str, files: &FileSet) -> Option<String> {
    let mut segments: Vec<&str> = raw.split("::").filter(|s| !s.is_empty()).collect();
    let head = *segments.first()?;

    let base = match head {
        "crate" => {
            segments.remove(0);
            rust_crate_root(from)
        }
        "self" => {
            segments.remove(0);
            rust_module_dir(from)
        }
        "super" => {
            let levels = segments.iter().take_while(|s| **s == "super").count();
            segments.drain(..levels);
            let mut dir = rust_module_dir(from);
            for _ in 0..levels {
                dir = parent(&dir).to_string();
            }
            dir
        }
        // A bare name is either `mod child;` or an external crate
        _ if segments.len() == 1 => rust_module_dir(from),
        _ => return None,
    };

    while segments.last().is_some_and(|s| *s == "self" || *s == "*") {
        segments.pop();
    }

    // `crate::a::b::Item` may name an item inside `a/b.rs`: trim until a file matches
    while !segments.is_empty() {
        let module = join(&base, &segments.join("/"));
        if let Some(found) = first_present([format!("{module}.rs"), format!("{module}/mod.rs")], files) {
            return Some(found);
        }
        segments.pop();
    }
    None
}

/// Resolve `raw` (imported from `from`) to a file in `files`.
///
/// Returns `None` for external or unknown specifiers.
pub fn resolve_import(language: Language, raw: &str, from: &str, files: &FileSet) -> Option<String> {
    match language {
        Language::JavaScript | Language::TypeScript => resolve_javascript(raw, from, files),
        Language::Python => resolve_python(raw, from, files),
        Language::Go => resolve_go(raw, files),
        Language::Elixir => resolve_elixir(raw, files),
        Language::Rust => resolve_rust(raw, from, files),
        _ => None,
    }
}
