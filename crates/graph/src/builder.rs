use crate::error::GraphError;
use crate::imports::extract_imports;
use crate::resolve::{resolve_import, FileSet};
use crate::types::{DependencyGraph, GraphStats, ImportEdge};
use codeintel_extract::{Language, SourceFile, SourceReader};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Parse and resolve the imports of one file against the project file set
pub fn parse_imports(path: &str, content: &str, language: Language, files: &FileSet) -> Vec<ImportEdge> {
    extract_imports(language, content)
        .into_iter()
        .map(|raw| ImportEdge {
            resolved: resolve_import(language, &raw, path, files),
            raw,
        })
        .collect()
}

/// Per-file result of the parallel phase
enum FileImports<'a> {
    Parsed { file: &'a SourceFile, edges: Vec<ImportEdge> },
    Unreadable { file: &'a SourceFile, error: GraphError },
}

/// Builds a [`DependencyGraph`] from a project's files.
///
/// Files are read and scanned in parallel; adjacency is merged afterwards on
/// the calling thread in input order, so the result does not depend on
/// scheduling.
pub struct GraphBuilder<'a> {
    reader: &'a dyn SourceReader,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(reader: &'a dyn SourceReader) -> Self {
        Self { reader }
    }

    fn scan<'f>(&self, file: &'f SourceFile, files: &FileSet) -> FileImports<'f> {
        match self.reader.read(&file.path) {
            Ok(content) => FileImports::Parsed {
                file,
                edges: parse_imports(&file.path, &content, file.language, files),
            },
            Err(e) => FileImports::Unreadable {
                file,
                error: GraphError::read(&file.path, format!("{e:#}")),
            },
        }
    }

    /// Build the graph over `files`.
    ///
    /// Every path in `files` is a resolution candidate; only files whose
    /// language has an import scanner are read. Unreadable files count as
    /// parse errors and are skipped.
    pub fn build(&self, files: &[SourceFile]) -> DependencyGraph {
        let file_set: FileSet = files.iter().map(|f| f.path.clone()).collect();

        let mut seen = HashSet::new();
        let parseable: Vec<&SourceFile> = files
            .iter()
            .filter(|f| f.language.has_import_parser())
            .filter(|f| seen.insert(f.path.as_str()))
            .collect();

        let scanned: Vec<FileImports> = parseable
            .par_iter()
            .map(|file| self.scan(file, &file_set))
            .collect();

        let mut graph = DependencyGraph::default();
        let mut languages = BTreeSet::new();
        let mut stats = GraphStats::default();

        for result in scanned {
            stats.total_files_parsed += 1;
            match result {
                FileImports::Parsed { file, edges } => {
                    languages.insert((file.language.as_str(), file.language));
                    for target in edges.into_iter().filter_map(|edge| edge.resolved) {
                        stats.total_edges += 1;
                        graph.add_edge(file.path.clone(), target);
                    }
                }
                FileImports::Unreadable { file, error } => {
                    languages.insert((file.language.as_str(), file.language));
                    log::debug!("Skipping {}: {error}", file.path);
                    stats.parse_errors += 1;
                }
            }
        }

        stats.languages_parsed = languages.into_iter().map(|(_, lang)| lang).collect();
        graph.stats = stats;

        log::info!(
            "Dependency graph: {} files parsed, {} edges, {} errors",
            graph.stats.total_files_parsed,
            graph.stats.total_edges,
            graph.stats.parse_errors
        );
        graph
    }
}

/// Build a dependency graph over `files`, reading content through `reader`
pub fn build_dependency_graph(files: &[SourceFile], reader: &dyn SourceReader) -> DependencyGraph {
    GraphBuilder::new(reader).build(files)
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
    fn test_parse_imports_marks_external() {
        let files: FileSet = ["src/a.js".to_string(), "src/b.js".to_string()].into();
        let edges = parse_imports(
            "src/a.js",
            "import b from './b';\nimport React from 'react';\n",
            Language::JavaScript,
            &files,
        );
        assert_eq!(
            edges,
            vec![
                ImportEdge {
                    raw: "./b".into(),
                    resolved: Some("src/b.js".into())
                },
                ImportEdge {
                    raw: "react".into(),
                    resolved: None
                },
            ]
        );
    }

    #[test]
    fn test_build_mixed_project() {
        let (files, content) = project(&[
            ("src/index.js", "const a = require('./a');\nimport b from './b.js';\nimport 'lodash';\n"),
            ("src/a.js", "module.exports = require('./b');\n"),
            ("src/b.js", "export const b = 1;\n"),
            ("tools/run.py", "from tools.helpers import VALUE\nimport os\n"),
            ("tools/helpers.py", "VALUE = 1\n"),
            ("README.md", "see ./a"),
        ]);
        let graph = build_dependency_graph(&files, &content);

        assert_eq!(graph.imports_of("src/index.js"), ["src/a.js", "src/b.js"]);
        assert_eq!(graph.importers_of("src/b.js"), ["src/index.js", "src/a.js"]);
        assert_eq!(graph.imports_of("tools/run.py"), ["tools/helpers.py"]);
        assert!(!graph.forward.contains_key("src/b.js"));

        assert_eq!(graph.stats.total_files_parsed, 5);
        assert_eq!(graph.stats.total_edges, 4);
        assert_eq!(
            graph.stats.languages_parsed,
            vec![Language::JavaScript, Language::Python]
        );
        assert_eq!(graph.stats.parse_errors, 0);
    }

    #[test]
    fn test_unreadable_file_counts_as_error() {
        let (mut files, content) = project(&[("a.js", "import './b';\n"), ("b.js", "")]);
        files.push(SourceFile::from_path("gone.js"));
        let graph = build_dependency_graph(&files, &content);
        assert_eq!(graph.stats.parse_errors, 1);
        assert_eq!(graph.stats.total_files_parsed, 3);
        assert_eq!(graph.imports_of("a.js"), ["b.js"]);
    }
}
