pub mod dir;

pub use dir::DirSource;

use thiserror::Error;

use crate::model::{Scenario, ScenarioDataset, ShapeError};

/// Why a scenario dataset could not be loaded.
///
/// Transport failures (`Status`, `Transport`, `Io`) and malformed payloads
/// (`Parse`, `Shape`) are the same error kind to callers; the display string
/// is what ends up in front of the user.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{path}: server responded with status {status}")]
    Status { path: String, status: u16 },
    #[error("{path}: request failed: {reason}")]
    Transport { path: String, reason: String },
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unexpected dataset shape: {0}")]
    Shape(#[from] ShapeError),
}

/// Where dataset documents come from. One call is one fresh read: sources
/// must not cache or retry.
pub trait DataSource {
    /// Fetch the raw document at `path` (relative to the site root).
    fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError>;
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        (**self).fetch(path)
    }
}

/// Parse and validate a dataset document.
pub fn parse_dataset(data: &[u8]) -> Result<ScenarioDataset, LoadError> {
    let dataset: ScenarioDataset = serde_json::from_slice(data)?;
    dataset.validate()?;
    Ok(dataset)
}

/// Fetch and parse the dataset for `scenario`.
pub fn load<S: DataSource + ?Sized>(
    source: &S,
    scenario: Scenario,
) -> Result<ScenarioDataset, LoadError> {
    let path = scenario.data_path();
    tracing::debug!(%scenario, %path, "loading scenario dataset");
    let data = source.fetch(&path)?;
    let dataset = parse_dataset(&data)?;
    tracing::debug!(
        %scenario,
        lanes = dataset.lanes.len(),
        max_steps = dataset.max_steps(),
        "scenario dataset loaded"
    );
    Ok(dataset)
}
