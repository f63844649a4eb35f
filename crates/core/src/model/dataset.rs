use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single named timing measurement within a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    /// Duration in milliseconds.
    pub ms: f64,
    /// Display color (`#rgb`, `#rrggbb`, or a basic color name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Step {
    pub fn new(name: impl Into<String>, ms: f64) -> Self {
        Self {
            name: name.into(),
            ms,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Precomputed timing data for one scenario.
///
/// `lanes` keeps the document's key order, which is the left-to-right lane
/// order of the diagram. `overall` is the end-to-end figure and is not
/// required to equal the sum of `totals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDataset {
    pub lanes: IndexMap<String, Vec<Step>>,
    pub totals: IndexMap<String, f64>,
    pub overall: f64,
}

impl ScenarioDataset {
    /// Length of the longest lane (0 when there are no lanes).
    pub fn max_steps(&self) -> usize {
        self.lanes.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn lane_names(&self) -> impl Iterator<Item = &str> {
        self.lanes.keys().map(String::as_str)
    }

    pub fn lane_total(&self, lane: &str) -> Option<f64> {
        self.totals.get(lane).copied()
    }

    pub fn step(&self, lane: &str, index: usize) -> Option<&Step> {
        self.lanes.get(lane).and_then(|steps| steps.get(index))
    }

    /// Check the shape invariants serde cannot express: every lane has a
    /// total, and every number is finite and non-negative.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if !is_duration(self.overall) {
            return Err(ShapeError::InvalidOverall(self.overall));
        }
        for (lane, steps) in &self.lanes {
            let Some(total) = self.totals.get(lane) else {
                return Err(ShapeError::MissingTotal(lane.clone()));
            };
            if !is_duration(*total) {
                return Err(ShapeError::InvalidTotal {
                    lane: lane.clone(),
                    total: *total,
                });
            }
            if let Some(step) = steps.iter().find(|s| !is_duration(s.ms)) {
                return Err(ShapeError::InvalidStep {
                    lane: lane.clone(),
                    step: step.name.clone(),
                    ms: step.ms,
                });
            }
        }
        Ok(())
    }
}

fn is_duration(ms: f64) -> bool {
    ms.is_finite() && ms >= 0.0
}

/// A dataset that parsed but breaks an invariant serde cannot express.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("overall total {0} is not a valid duration")]
    InvalidOverall(f64),
    #[error("lane {0:?} has no entry in totals")]
    MissingTotal(String),
    #[error("total {total} for lane {lane:?} is not a valid duration")]
    InvalidTotal { lane: String, total: f64 },
    #[error("step {step:?} in lane {lane:?} has invalid duration {ms}")]
    InvalidStep { lane: String, step: String, ms: f64 },
}
