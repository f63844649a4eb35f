use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    TitleText,

    LaneBackground,
    LaneBorder,
    LaneHeaderBackground,
    LaneHeaderText,

    /// Neutral step fill, used when a step carries no color of its own.
    StepFill,
    StepBorder,
    StepText,
    StepValueText,

    Connector,

    HoverHighlight,

    TooltipBackground,
    TooltipText,

    ErrorText,
}
