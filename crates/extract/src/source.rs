use anyhow::{anyhow, Context};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Supplies file content by project-relative path.
///
/// Implementations must be shareable across worker threads; the repo map
/// and graph builder read files from a rayon pool.
pub trait SourceReader: Sync {
    fn read(&self, path: &str) -> anyhow::Result<String>;
}

/// Reads files from disk below a project root
#[derive(Debug, Clone)]
pub struct FsReader {
    root: PathBuf,
}

impl FsReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceReader for FsReader {
    fn read(&self, path: &str) -> anyhow::Result<String> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full)
            .with_context(|| format!("failed to read {}", full.display()))
    }
}

impl SourceReader for HashMap<String, String> {
    fn read(&self, path: &str) -> anyhow::Result<String> {
        self.get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such file: {path}"))
    }
}

impl SourceReader for BTreeMap<String, String> {
    fn read(&self, path: &str) -> anyhow::Result<String> {
        self.get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such file: {path}"))
    }
}
