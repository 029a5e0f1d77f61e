//! Pattern-based extraction for JavaScript-family files no grammar accepts,
//! and the legacy `module.exports` scan that runs on every such file.

use crate::types::{Signature, SignatureKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static FUNCTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:export\s+)?(?:async\s+)?function\s*\*?\s+(\w+)\s*\(([^)]*)\)")
        .expect("valid regex literal")
});
static CLASS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:export\s+)?class\s+(\w+)").expect("valid regex literal"));
static ARROW_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:export\s+)?(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?\(?([^)]*)\)?\s*=>")
        .expect("valid regex literal")
});
static ASYNC_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"async\s+function").expect("valid regex literal"));
static GENERATOR_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function\s*\*").expect("valid regex literal"));
static ASYNC_ARROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"=\s*async").expect("valid regex literal"));

static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//[^\n]*").expect("valid regex literal"));
static MODULE_EXPORTS_PROP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"module\.exports\.(\w+)\s*=").expect("valid regex literal"));
static BARE_EXPORTS_PROP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^.\w])exports\.(\w+)\s*=").expect("valid regex literal"));
static MODULE_EXPORTS_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"module\.exports\s*=\s*\{([^}]+)\}").expect("valid regex literal"));
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("valid regex literal"));

/// Reduce `name: Type = default` to `name`
fn param_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|param| {
            param
                .split(['=', ':'])
                .next()
                .unwrap_or("")
                .trim()
                .trim_end_matches('?')
                .to_string()
        })
        .filter(|param| !param.is_empty())
        .collect()
}

/// Line-oriented signatures for unparseable JavaScript-family source.
///
/// Only top-of-line function, class and arrow declarations are found.
pub fn scan_js_signatures(code: &str) -> Vec<Signature> {
    let mut signatures = Vec::new();

    for (index, line) in code.lines().enumerate() {
        let line_no = index + 1;

        if let Some(caps) = FUNCTION_LINE.captures(line) {
            signatures.push(
                Signature::new(&caps[1], SignatureKind::Function, line_no)
                    .with_params(param_names(&caps[2]))
                    .with_async(ASYNC_FUNCTION.is_match(line))
                    .with_generator(GENERATOR_FUNCTION.is_match(line)),
            );
        } else if let Some(caps) = CLASS_LINE.captures(line) {
            signatures.push(Signature::new(&caps[1], SignatureKind::Class, line_no));
        } else if let Some(caps) = ARROW_LINE.captures(line) {
            signatures.push(
                Signature::new(&caps[1], SignatureKind::Arrow, line_no)
                    .with_params(param_names(&caps[2]))
                    .with_async(ASYNC_ARROW.is_match(line)),
            );
        }
    }

    signatures
}

/// Names exported by assignment to `module.exports` or `exports`.
///
/// For `module.exports = { a, b: c }` only the keys are reported.
pub fn scan_legacy_exports(code: &str) -> Vec<String> {
    let stripped = LINE_COMMENT.replace_all(code, "");
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    let mut add = |name: &str| {
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    };

    for caps in MODULE_EXPORTS_PROP.captures_iter(&stripped) {
        add(&caps[1]);
    }
    for caps in BARE_EXPORTS_PROP.captures_iter(&stripped) {
        add(&caps[1]);
    }
    if let Some(caps) = MODULE_EXPORTS_OBJECT.captures(&stripped) {
        for entry in caps[1].split(',') {
            let key = entry.split(':').next().unwrap_or("").trim();
            if IDENTIFIER.is_match(key) {
                add(key);
            }
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_function_lines() {
        let code = "export async function fetchAll(url, opts = {}) {\nfunction* gen() {\n  function nested() {}\n";
        let sigs = scan_js_signatures(code);
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[0].name, "fetchAll");
        assert_eq!(sigs[0].params, vec!["url", "opts"]);
        assert!(sigs[0].is_async);
        assert!(sigs[1].generator);
        assert_eq!(sigs[1].line, 2);
    }

    #[test]
    fn test_scan_class_and_arrow_lines() {
        let code = "class Foo extends Bar {\nconst handle = async (req: Request, res) => {\nlet id = x => x;\n";
        let sigs = scan_js_signatures(code);
        assert_eq!(sigs[0].kind, SignatureKind::Class);
        assert_eq!(sigs[1].kind, SignatureKind::Arrow);
        assert_eq!(sigs[1].params, vec!["req", "res"]);
        assert!(sigs[1].is_async);
        assert_eq!(sigs[2].name, "id");
        assert_eq!(sigs[2].params, vec!["x"]);
    }

    #[test]
    fn test_scan_nothing() {
        assert!(scan_js_signatures("// just a comment\n").is_empty());
    }

    #[test]
    fn test_legacy_exports() {
        let code = "module.exports.alpha = 1;\nexports.beta = 2;\n// exports.gamma = 3;\nmodule.exports = { delta, epsilon: impl, alpha };\n";
        assert_eq!(scan_legacy_exports(code), vec!["alpha", "beta", "delta", "epsilon"]);
    }

    #[test]
    fn test_legacy_exports_ignore_member_chains() {
        assert!(scan_legacy_exports("foo.exports.bar = 1;\n").is_empty());
    }
}
