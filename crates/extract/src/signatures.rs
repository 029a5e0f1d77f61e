use crate::ast::{collect_sites, parse_source, walk_exports, SiteScope};
use crate::detectors::detector_for;
use crate::error::{ErrorTag, ExtractError, Result};
use crate::fallback::{scan_js_signatures, scan_legacy_exports};
use crate::language::Language;
use crate::source::SourceReader;
use crate::types::{ExportReport, ExportSurface, ModuleKind, SignatureReport, SourceFile};

fn merge_legacy(mut surface: ExportSurface, code: &str) -> ExportSurface {
    surface.cjs_exports = scan_legacy_exports(code);
    let has_esm = !surface.named.is_empty()
        || surface.default.is_some()
        || !surface.re_exports.is_empty();
    surface.kind = ModuleKind::infer(has_esm, !surface.cjs_exports.is_empty());
    surface
}

/// Extract signatures (and, for the JavaScript family, the export surface)
/// from one file's content.
///
/// Never fails: problems are reported through [`SignatureReport::error`]
/// next to whatever could still be extracted.
pub fn extract_signatures(path: &str, language: Language, content: &str) -> SignatureReport {
    if !language.is_known() {
        return SignatureReport::failed(language, ErrorTag::UnknownLanguage);
    }

    if language.has_grammar() {
        return match parse_source(language, path, content) {
            Some(parsed) => {
                let signatures = collect_sites(parsed.root(), parsed.src(), SiteScope::TopLevel)
                    .into_iter()
                    .map(|site| site.signature)
                    .collect();
                let surface = merge_legacy(walk_exports(parsed.root(), parsed.src()), content);
                SignatureReport {
                    language,
                    signatures,
                    export_surface: Some(surface),
                    error: None,
                }
            }
            None => {
                let signatures = scan_js_signatures(content);
                log::debug!(
                    "Line-pattern fallback found {} signatures in {path}",
                    signatures.len()
                );
                let error = signatures.is_empty().then_some(ErrorTag::ParseFailed);
                SignatureReport {
                    language,
                    signatures,
                    export_surface: Some(merge_legacy(ExportSurface::default(), content)),
                    error,
                }
            }
        };
    }

    match detector_for(language) {
        Some(detector) => SignatureReport {
            language,
            signatures: detector.detect(content),
            export_surface: None,
            error: None,
        },
        None => SignatureReport::failed(language, ErrorTag::NoDetector),
    }
}

/// Extract only the export surface of a JavaScript-family file
pub fn extract_exports(path: &str, language: Language, content: &str) -> ExportReport {
    if !language.is_js_family() {
        return ExportReport {
            language,
            surface: ExportSurface::default(),
            error: Some(ErrorTag::UnsupportedLanguage),
        };
    }

    let declarative = parse_source(language, path, content)
        .map(|parsed| walk_exports(parsed.root(), parsed.src()))
        .unwrap_or_default();
    ExportReport {
        language,
        surface: merge_legacy(declarative, content),
        error: None,
    }
}

/// Read one file through `reader`
pub fn read_source(reader: &dyn SourceReader, path: &str) -> Result<String> {
    reader.read(path).map_err(|e| {
        log::debug!("Cannot read {path}: {e:#}");
        ExtractError::file_not_found(path, format!("{e:#}"))
    })
}

/// Read a file and extract its signatures, tagging unreadable files
pub fn extract_file_signatures(reader: &dyn SourceReader, file: &SourceFile) -> SignatureReport {
    match read_source(reader, &file.path) {
        Ok(content) => extract_signatures(&file.path, file.language, &content),
        Err(e) => SignatureReport::failed(file.language, e.tag().unwrap_or(ErrorTag::FileNotFound)),
    }
}

/// Read a file and extract its export surface, tagging unreadable files
pub fn extract_file_exports(reader: &dyn SourceReader, file: &SourceFile) -> ExportReport {
    match read_source(reader, &file.path) {
        Ok(content) => extract_exports(&file.path, file.language, &content),
        Err(e) => ExportReport {
            language: file.language,
            surface: ExportSurface::default(),
            error: e.tag(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignatureKind;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_add_function() {
        let report = extract_signatures(
            "math.js",
            Language::JavaScript,
            "function add(a, b) { return a + b; }",
        );
        assert_eq!(report.error, None);
        assert_eq!(report.signatures.len(), 1);
        let sig = &report.signatures[0];
        assert_eq!(sig.name, "add");
        assert_eq!(sig.kind, SignatureKind::Function);
        assert_eq!(sig.params, vec!["a", "b"]);
        assert_eq!(sig.line, 1);
        assert!(!sig.is_async);
        assert!(!sig.generator);
    }

    #[test]
    fn test_module_kinds() {
        let esm = extract_signatures("a.js", Language::JavaScript, "export const a = () => 1;\n");
        assert_eq!(esm.export_surface.unwrap().kind, ModuleKind::Esm);

        let cjs = extract_signatures("b.js", Language::JavaScript, "module.exports = { run };\n");
        let surface = cjs.export_surface.unwrap();
        assert_eq!(surface.kind, ModuleKind::Cjs);
        assert_eq!(surface.cjs_exports, vec!["run"]);

        let mixed = extract_signatures(
            "c.js",
            Language::JavaScript,
            "export default App;\nexports.helper = 1;\n",
        );
        assert_eq!(mixed.export_surface.unwrap().kind, ModuleKind::Mixed);
    }

    #[test]
    fn test_parse_failure_uses_line_patterns() {
        let code = "export function ok(a) {\n  return a +;\n}\n";
        let report = extract_signatures("bad.js", Language::JavaScript, code);
        assert_eq!(report.error, None);
        assert_eq!(report.signatures[0].name, "ok");

        let report = extract_signatures("bad.js", Language::JavaScript, "}}}{{{");
        assert_eq!(report.error, Some(ErrorTag::ParseFailed));
        assert!(report.signatures.is_empty());
    }

    #[test]
    fn test_detector_and_missing_detector() {
        let py = extract_signatures("a.py", Language::Python, "def f(x):\n    pass\n");
        assert_eq!(py.signatures.len(), 1);
        assert!(py.export_surface.is_none());

        let unknown = extract_signatures("a.txt", Language::Unknown, "hello");
        assert_eq!(unknown.error, Some(ErrorTag::UnknownLanguage));
    }

    #[test]
    fn test_exports_unsupported_language() {
        let report = extract_exports("a.go", Language::Go, "package a");
        assert_eq!(report.error, Some(ErrorTag::UnsupportedLanguage));
    }

    #[test]
    fn test_unreadable_file() {
        let files: HashMap<String, String> = HashMap::new();
        let report = extract_file_signatures(&files, &SourceFile::from_path("gone.js"));
        assert_eq!(report.error, Some(ErrorTag::FileNotFound));
        assert!(report.signatures.is_empty());
    }
}
