//! Core of the swimlane latency diagram: data model, loader, layout,
//! render-command generation, interaction models, and SVG export.

pub mod color;
pub mod controller;
pub mod format;
pub mod hit;
pub mod layout;
pub mod loader;
pub mod model;
pub mod svg;
pub mod tooltip;
pub mod views;

pub use controller::{DiagramState, RequestToken, ScenarioController};
pub use layout::{DiagramLayout, LayoutConfig};
pub use loader::{DataSource, DirSource, LoadError};
pub use model::{CollapseState, Scenario, ScenarioDataset, ShapeError, Step};
