//! Type-syntax stripping for TypeScript sources.
//!
//! When the native TypeScript grammar rejects a file, the extractor strips
//! type-only syntax and re-parses the result as plain JavaScript. Every
//! rewrite keeps the newlines of the span it removes, so line numbers
//! reported against the stripped text match the original file.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

static TYPE_IMPORT: Lazy<Regex> = Lazy::new(|| {
    re(r#"(?m)^[ \t]*import\s+type\s+\{[^}]*\}\s+from\s+['"][^'"]*['"];?[ \t]*$"#)
});
static IMPORT_CLAUSE: Lazy<Regex> = Lazy::new(|| re(r"\bimport\s*\{[^}]*\}"));
static TYPE_SPECIFIER: Lazy<Regex> = Lazy::new(|| re(r"\btype\s+\w+\s*,?\s*"));
static INTERFACE: Lazy<Regex> = Lazy::new(|| {
    re(r"(?m)^[ \t]*(?:export\s+)?interface\s+\w+(?:<[^>]*>)?(?:\s+extends\s+[^{]*)?\s*\{[^}]*\}")
});
static TYPE_ALIAS: Lazy<Regex> =
    Lazy::new(|| re(r"(?m)^[ \t]*(?:export\s+)?type\s+\w+(?:<[^>]*>)?\s*=[^;]*;"));
static ENUM: Lazy<Regex> =
    Lazy::new(|| re(r"(?m)^[ \t]*(?:export\s+)?(?:const\s+)?enum\s+\w+\s*\{[^}]*\}"));
static DECLARE: Lazy<Regex> =
    Lazy::new(|| re(r"(?m)^[ \t]*(?:export\s+)?declare\s+[^;{]*(?:;|\{[^}]*\})"));
static GENERIC_PARAMS: Lazy<Regex> = Lazy::new(|| {
    re(r"<\s*[A-Z_]\w*(?:\s+extends\s+[^>]*)?\s*(?:,\s*[A-Z_]\w*(?:\s+extends\s+[^>]*)?\s*)*>")
});
static RETURN_TYPE: Lazy<Regex> = Lazy::new(|| {
    re(r"\)(\s*:\s*(?:Promise\s*<[^>]*>|[\w\[\]|&<>.,\s?]+?))(\s*[{=])")
});
static PARAM_TYPE: Lazy<Regex> =
    Lazy::new(|| re(r"(\w+)(\s*:\s*[\w\[\]|&<>.,\s?]+?)([,)=])"));
static OPTIONAL_MARK: Lazy<Regex> = Lazy::new(|| re(r"(\w+)\?(\s*[,)=:])"));
static AS_CAST: Lazy<Regex> =
    Lazy::new(|| re(r"(\bas\s+(?:const|[\w\[\]|&<>.,\s?]+?))([,;)\]}])"));
static NON_NULL: Lazy<Regex> = Lazy::new(|| re(r"(\w+)!([.\[])"));
static ANGLE_CAST: Lazy<Regex> = Lazy::new(|| re(r"<\w+>(\s*\w)"));
static READONLY: Lazy<Regex> = Lazy::new(|| re(r"\breadonly\s+"));
static ACCESS_MODIFIER: Lazy<Regex> =
    Lazy::new(|| re(r"(?m)^([ \t]*)(?:public|private|protected|override)\s+"));
static ABSTRACT: Lazy<Regex> = Lazy::new(|| re(r"\babstract\s+"));
static IMPLEMENTS: Lazy<Regex> = Lazy::new(|| re(r"(\s*\bimplements\s+[\w\s,<>]+?)(\s*\{)"));

/// Keep only the line breaks of a removed span
fn newlines(removed: &str) -> String {
    removed.chars().filter(|c| *c == '\n').collect()
}

fn blank(code: &str, pattern: &Regex) -> String {
    pattern
        .replace_all(code, |caps: &Captures<'_>| newlines(&caps[0]))
        .into_owned()
}

/// Strip TypeScript-only syntax so the result parses as JavaScript
pub fn strip_type_syntax(code: &str) -> String {
    let mut code = blank(code, &TYPE_IMPORT);

    code = IMPORT_CLAUSE
        .replace_all(&code, |caps: &Captures<'_>| -> String {
            match TYPE_SPECIFIER.replace_all(&caps[0], "") {
                Cow::Borrowed(unchanged) => unchanged.to_string(),
                Cow::Owned(stripped) => {
                    let lost = newlines(&caps[0]).len() - newlines(&stripped).len();
                    stripped + &"\n".repeat(lost)
                }
            }
        })
        .into_owned();

    for pattern in [&*INTERFACE, &*TYPE_ALIAS, &*ENUM, &*DECLARE, &*GENERIC_PARAMS] {
        code = blank(&code, pattern);
    }

    code = RETURN_TYPE
        .replace_all(&code, |caps: &Captures<'_>| {
            format!("){}{}", newlines(&caps[1]), &caps[2])
        })
        .into_owned();

    code = PARAM_TYPE
        .replace_all(&code, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], newlines(&caps[2]), &caps[3])
        })
        .into_owned();

    code = OPTIONAL_MARK.replace_all(&code, "$1$2").into_owned();

    code = AS_CAST
        .replace_all(&code, |caps: &Captures<'_>| {
            format!("{}{}", newlines(&caps[1]), &caps[2])
        })
        .into_owned();

    code = NON_NULL.replace_all(&code, "$1$2").into_owned();
    code = ANGLE_CAST.replace_all(&code, "$1").into_owned();
    code = blank(&code, &READONLY);

    code = ACCESS_MODIFIER
        .replace_all(&code, |caps: &Captures<'_>| {
            let removed = &caps[0][caps[1].len()..];
            format!("{}{}", &caps[1], newlines(removed))
        })
        .into_owned();

    code = blank(&code, &ABSTRACT);

    IMPLEMENTS
        .replace_all(&code, |caps: &Captures<'_>| {
            format!("{}{}", newlines(&caps[1]), &caps[2])
        })
        .into_owned()
}
