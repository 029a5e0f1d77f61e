//! Per-function cyclomatic complexity.

use crate::ast::{collect_sites, parse_source, NodeKind, SiteScope};
use crate::error::ErrorTag;
use crate::language::Language;
use crate::types::{ComplexityReport, FunctionComplexity};
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

/// Name reported for the whole-file approximation
pub const MODULE_ENTRY: &str = "<module>";

static BRANCH_KEYWORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bif\b",
        r"\belse\s+if\b",
        r"\bfor\b",
        r"\bwhile\b",
        r"\bswitch\b",
        r"\bcase\b",
        r"\bcatch\b",
        r"&&",
        r"\|\|",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex literal"))
    .collect()
});

/// Branch count and deepest control-flow nesting of one body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BodyScore {
    pub branches: usize,
    pub nesting_max: usize,
}

fn is_logical(node: Node<'_>) -> bool {
    node.child_by_field_name("operator")
        .map(|op| matches!(op.kind(), "&&" | "||" | "??"))
        .unwrap_or(false)
}

/// Score a function body without crossing into nested function literals
pub(crate) fn score_body(body: Node<'_>) -> BodyScore {
    let mut score = BodyScore::default();
    let mut stack = vec![(body, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        let kind = NodeKind::of(node);
        score.branches += match kind {
            NodeKind::If
            | NodeKind::Ternary
            | NodeKind::Loop
            | NodeKind::Catch
            | NodeKind::SwitchCase => 1,
            NodeKind::Binary if is_logical(node) => 1,
            _ => 0,
        };

        let child_depth = match kind {
            NodeKind::If | NodeKind::Loop | NodeKind::Switch | NodeKind::Catch => depth + 1,
            _ => depth,
        };
        score.nesting_max = score.nesting_max.max(child_depth);

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if !NodeKind::of(child).is_function_boundary() {
                stack.push((child, child_depth));
            }
        }
    }
    score
}

/// Textual approximation: one plus the number of branching keywords.
///
/// This is not cyclomatic complexity; comments and strings count too.
pub fn approximate_complexity(code: &str) -> usize {
    1 + BRANCH_KEYWORDS
        .iter()
        .map(|pattern| pattern.find_iter(code).count())
        .sum::<usize>()
}

fn approximate_report(path: &str, code: &str, error: Option<ErrorTag>) -> ComplexityReport {
    let approx = approximate_complexity(code);
    ComplexityReport {
        file: path.to_string(),
        module_complexity: approx,
        functions: vec![FunctionComplexity {
            name: MODULE_ENTRY.to_string(),
            line: 1,
            complexity: approx,
            nesting_max: 0,
        }],
        error,
    }
}

/// Compute per-function complexity for a file.
///
/// JavaScript-family files are scored function by function from the syntax
/// tree, including functions nested in other function bodies. Everything
/// else, and any JavaScript-family file no grammar accepts, gets a single
/// [`MODULE_ENTRY`] score from [`approximate_complexity`].
pub fn compute_complexity(path: &str, language: Language, content: &str) -> ComplexityReport {
    if !language.is_known() {
        return ComplexityReport::failed(path, ErrorTag::UnknownLanguage);
    }

    if !language.has_grammar() {
        return approximate_report(path, content, None);
    }

    let Some(parsed) = parse_source(language, path, content) else {
        log::debug!("Scoring {path} with keyword approximation");
        return approximate_report(path, content, Some(ErrorTag::ParseFailedRegexFallback));
    };

    let functions: Vec<FunctionComplexity> = collect_sites(parsed.root(), parsed.src(), SiteScope::Nested)
        .into_iter()
        .filter_map(|site| {
            let body = site.body?;
            let score = score_body(body);
            Some(FunctionComplexity {
                name: site.signature.name,
                line: site.signature.line,
                complexity: 1 + score.branches,
                nesting_max: score.nesting_max,
            })
        })
        .collect();

    ComplexityReport {
        file: path.to_string(),
        module_complexity: functions.iter().map(|f| f.complexity).sum(),
        functions,
        error: None,
    }
}
