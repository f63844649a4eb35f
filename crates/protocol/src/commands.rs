use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Color, Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` per render. Backends (SVG, DOM,
/// egui, terminal) consume this list sequentially; each command carries all
/// the data it needs, in absolute diagram coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled, optionally rounded rectangle. `target` marks the rect
    /// as interactive (hover / click).
    DrawRect {
        rect: Rect,
        paint: Paint,
        border_color: Option<ThemeToken>,
        corner_radius: f64,
        label: Option<String>,
        target: Option<HitTarget>,
    },

    /// Draw a text string anchored at a baseline position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        strong: bool,
        align: TextAlign,
    },

    /// Draw a line segment ending in an arrowhead at `to`.
    DrawArrow {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Begin a logical group (a lane, or a lane's step stack). A hidden
    /// group keeps its geometry but is not displayed and not hit-testable.
    BeginGroup {
        id: String,
        label: Option<String>,
        hidden: bool,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Fill of a rectangle: either a semantic theme token or a literal color
/// supplied by the data (e.g. a step's cost-category color).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Theme(ThemeToken),
    Custom(Color),
}

/// What an interactive rectangle refers to, for hit-testing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitTarget {
    /// The `index`-th step of lane `lane`.
    Step { lane: String, index: usize },
    /// The clickable header of lane `lane`.
    LaneHeader { lane: String },
}

impl HitTarget {
    pub fn lane(&self) -> &str {
        match self {
            Self::Step { lane, .. } | Self::LaneHeader { lane } => lane,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_as_tagged_json() {
        let cmd = RenderCommand::DrawRect {
            rect: Rect::new(1.0, 2.0, 3.0, 4.0),
            paint: Paint::Theme(ThemeToken::StepFill),
            border_color: Some(ThemeToken::StepBorder),
            corner_radius: 8.0,
            label: Some("Input".into()),
            target: Some(HitTarget::Step {
                lane: "Leader".into(),
                index: 0,
            }),
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.starts_with("{\"DrawRect\""));
        assert!(json.contains("\"StepFill\""));
        let back: Option<RenderCommand> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(cmd));
    }

    #[test]
    fn hit_target_lane() {
        let step = HitTarget::Step {
            lane: "Video".into(),
            index: 3,
        };
        let header = HitTarget::LaneHeader {
            lane: "Leader".into(),
        };
        assert_eq!(step.lane(), "Video");
        assert_eq!(header.lane(), "Leader");
    }
}
