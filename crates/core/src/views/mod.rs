pub mod swimlane;
pub mod visible;

pub use swimlane::{Diagram, render_swimlane};
pub use visible::{VisibleCommands, visible_commands};
