pub mod collapse;
pub mod dataset;
pub mod scenario;

pub use collapse::CollapseState;
pub use dataset::{ScenarioDataset, ShapeError, Step};
pub use scenario::{Scenario, ScenarioParseError};
