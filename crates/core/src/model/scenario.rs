use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the fixed timing profiles a dataset is published for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    Best,
    #[default]
    Typical,
    Worst,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scenario {0:?} (expected one of Best, Typical, Worst)")]
pub struct ScenarioParseError(pub String);

impl Scenario {
    /// All scenarios, in selection-control order.
    pub const ALL: [Scenario; 3] = [Scenario::Best, Scenario::Typical, Scenario::Worst];

    pub fn name(self) -> &'static str {
        match self {
            Self::Best => "Best",
            Self::Typical => "Typical",
            Self::Worst => "Worst",
        }
    }

    /// Static location of this scenario's dataset, relative to the site root.
    pub fn data_path(self) -> String {
        format!("data/latency_{}.json", self.name())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScenarioParseError(s.to_string()))
    }
}
