use std::path::{Path, PathBuf};

use super::{DataSource, LoadError};

/// Reads dataset documents from a directory laid out like the static site
/// root (`<root>/data/latency_<Scenario>.json`).
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataSource for DirSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|source| LoadError::Io {
            path: full.display().to_string(),
            source,
        })
    }
}
