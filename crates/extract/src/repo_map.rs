//! Token-budgeted repository map.
//!
//! Files are ranked by how many signatures they declare and rendered as
//! compact sections until the character budget (tokens × 4, plus slack) is
//! spent. At least one file is always included when any file qualifies.

use crate::cache::SignatureCache;
use crate::config::ExtractConfig;
use crate::signatures::{extract_exports, extract_signatures, read_source};
use crate::source::SourceReader;
use crate::types::{estimate_tokens, RepoMap, Signature, SignatureKind, SourceFile};
use rayon::prelude::*;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

const TITLE: &str = "# Repo Map";

struct FileEntry {
    path: String,
    signatures: Arc<Vec<Signature>>,
    export_names: Vec<String>,
}

/// Renders [`RepoMap`]s under a given configuration
pub struct RepoMapper<'a> {
    config: &'a ExtractConfig,
    cache: Option<&'a SignatureCache>,
}

impl<'a> RepoMapper<'a> {
    pub fn new(config: &'a ExtractConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Reuse signature reports across calls
    #[must_use]
    pub fn with_cache(mut self, cache: &'a SignatureCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn signatures_for(&self, file: &SourceFile, content: &str) -> Arc<Vec<Signature>> {
        match self.cache {
            Some(cache) => {
                let report = cache.get_or_extract(&file.path, file.language, content);
                Arc::new(report.signatures.clone())
            }
            None => Arc::new(extract_signatures(&file.path, file.language, content).signatures),
        }
    }

    fn load(&self, file: &SourceFile, reader: &dyn SourceReader) -> Option<FileEntry> {
        let content = read_source(reader, &file.path).ok()?;

        let signatures = self.signatures_for(file, &content);
        let export_names = if file.language.is_js_family() {
            extract_exports(&file.path, file.language, &content)
                .surface
                .export_names()
        } else {
            Vec::new()
        };

        if signatures.is_empty() && export_names.is_empty() {
            return None;
        }
        Some(FileEntry {
            path: file.path.clone(),
            signatures,
            export_names,
        })
    }

    fn signature_line(&self, sig: &Signature) -> String {
        let prefix = match sig.kind {
            SignatureKind::Method => "    method",
            SignatureKind::Class => "  class",
            SignatureKind::Function | SignatureKind::Arrow => "  fn",
        };
        let async_mark = if sig.is_async { "async " } else { "" };
        let params = truncate(&sig.params.join(", "), self.config.max_params_chars);
        format!("{prefix} {async_mark}{}({params}) :{}", sig.name, sig.line)
    }

    fn render_section(&self, entry: &FileEntry, max_signatures: usize) -> String {
        let mut lines = Vec::with_capacity(max_signatures.min(entry.signatures.len()) + 3);
        if entry.export_names.is_empty() {
            lines.push(format!("## {}", entry.path));
        } else {
            lines.push(format!("## {} ({} exports)", entry.path, entry.export_names.len()));
        }

        lines.extend(
            entry
                .signatures
                .iter()
                .take(max_signatures)
                .map(|sig| self.signature_line(sig)),
        );
        if entry.signatures.len() > max_signatures {
            lines.push(format!("  ... +{} more", entry.signatures.len() - max_signatures));
        }

        if !entry.export_names.is_empty() {
            let exports = truncate(&entry.export_names.join(", "), self.config.max_exports_chars);
            lines.push(format!("  exports: {exports}"));
        }

        lines.push(String::new());
        lines.join("\n")
    }

    /// Build the map for `files`, reading content through `reader`
    pub fn generate(
        &self,
        files: &[SourceFile],
        reader: &dyn SourceReader,
        token_budget: usize,
    ) -> RepoMap {
        let candidates: Vec<&SourceFile> = files
            .iter()
            .filter(|file| file.language.is_known())
            .filter(|file| self.config.is_code_path(&file.path))
            .filter(|file| !self.config.is_skipped_path(&file.path))
            .collect();

        let mut entries: Vec<FileEntry> = candidates
            .par_iter()
            .filter_map(|file| self.load(file, reader))
            .collect();
        entries.sort_by(|a, b| b.signatures.len().cmp(&a.signatures.len()));

        let ceiling = self.config.char_ceiling(token_budget);
        let mut sections = vec![TITLE.to_string(), String::new()];
        let mut total_chars = TITLE.len() + 1;
        let mut files_included = 0;
        let mut total_signatures = 0;

        for entry in &entries {
            let remaining = ceiling - total_chars as f64;
            let max_signatures = if remaining < self.config.tight_budget_chars as f64 {
                self.config.tight_signatures_per_file
            } else {
                self.config.max_signatures_per_file
            };

            let section = self.render_section(entry, max_signatures);
            if (total_chars + section.len()) as f64 > ceiling && files_included > 0 {
                break;
            }

            total_chars += section.len();
            files_included += 1;
            total_signatures += entry.signatures.len();
            sections.push(section);
        }

        let summary = sections.join("\n").trim().to_string();
        log::debug!(
            "Repo map: {files_included}/{} files, {total_signatures} signatures",
            entries.len()
        );

        RepoMap {
            token_estimate: estimate_tokens(&summary),
            summary,
            files_included,
            total_signatures,
        }
    }
}

/// Cut `text` to `max` graphemes, marking the cut with `...`
fn truncate(text: &str, max: usize) -> String {
    if text.graphemes(true).count() <= max {
        return text.to_string();
    }
    let kept: String = text.graphemes(true).take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Build a repo map with the default configuration
pub fn generate_repo_map(
    files: &[SourceFile],
    reader: &dyn SourceReader,
    token_budget: usize,
) -> RepoMap {
    let config = ExtractConfig::default();
    RepoMapper::new(&config).generate(files, reader, token_budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn project(files: &[(&str, &str)]) -> (Vec<SourceFile>, HashMap<String, String>) {
        let list = files.iter().map(|(p, _)| SourceFile::from_path(*p)).collect();
        let content = files
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect();
        (list, content)
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 40), "short");
        assert_eq!(truncate(&"a".repeat(41), 40), format!("{}...", "a".repeat(37)));
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_single_file_map() {
        let (files, content) = project(&[(
            "src/math.js",
            "export function add(a, b) { return a + b; }\nexport async function load() {}\n",
        )]);
        let map = generate_repo_map(&files, &content, 1000);
        assert_eq!(
            map.summary,
            "# Repo Map\n\n## src/math.js (2 exports)\n  fn add(a, b) :1\n  fn async load() :2\n  exports: add, load"
        );
        assert_eq!(map.files_included, 1);
        assert_eq!(map.total_signatures, 2);
        assert_eq!(map.token_estimate, map.summary.len().div_ceil(4));
    }

    #[test]
    fn test_ordering_and_filters() {
        let (files, content) = project(&[
            ("a.py", "def one():\n  pass\n"),
            ("b.py", "def one():\n  pass\ndef two():\n  pass\n"),
            ("dist/bundle.js", "function huge() {}\n"),
            ("README.md", "# readme\n"),
            ("empty.py", "x = 1\n"),
        ]);
        let map = generate_repo_map(&files, &content, 1000);
        assert_eq!(map.files_included, 2);
        assert!(map.summary.find("## b.py").unwrap() < map.summary.find("## a.py").unwrap());
        assert!(!map.summary.contains("bundle"));
        assert!(!map.summary.contains("empty.py"));
    }

    #[test]
    fn test_budget_stops_but_keeps_first_file() {
        let big: String = (0..50).map(|i| format!("def f{i}(x):\n  pass\n")).collect();
        let (files, content) = project(&[("big.py", big.as_str()), ("small.py", "def g():\n  pass\n")]);
        let map = generate_repo_map(&files, &content, 10);
        assert_eq!(map.files_included, 1);
        assert!(map.summary.contains("  ... +40 more"));
        assert_eq!(map.total_signatures, 50);
    }

    #[test]
    fn test_cache_is_used() {
        let (files, content) = project(&[("a.py", "def one():\n  pass\n")]);
        let config = ExtractConfig::default();
        let cache = SignatureCache::new(4);
        let mapper = RepoMapper::new(&config).with_cache(&cache);
        let first = mapper.generate(&files, &content, 1000);
        let second = mapper.generate(&files, &content, 1000);
        assert_eq!(first, second);
        assert_eq!(cache.stats().hits, 1);
    }
}
