//! The single floating tooltip shown while hovering a step box.

use swimlane_protocol::Point;

use crate::format::format_ms;
use crate::model::Step;

/// Offset of the tooltip from the cursor, in both axes.
pub const CURSOR_OFFSET: f64 = 12.0;
/// Fade in/out duration in seconds.
pub const FADE_SECS: f32 = 0.15;
/// Opacity of a fully shown tooltip.
pub const VISIBLE_OPACITY: f32 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub detail: String,
}

/// One tooltip per renderer host, created once and reused.
///
/// `show` overwrites the content and position in place; `hide` only fades
/// it out, so the last content stays around until the next hover.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    content: Option<TooltipContent>,
    position: Point,
    opacity: f32,
    target_opacity: f32,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self::new()
    }
}

impl Tooltip {
    pub fn new() -> Self {
        Self {
            content: None,
            position: Point::new(0.0, 0.0),
            opacity: 0.0,
            target_opacity: 0.0,
        }
    }

    /// Show `step` near `cursor` (page coordinates).
    pub fn show(&mut self, step: &Step, cursor: Point) {
        let content = TooltipContent {
            title: step.name.clone(),
            detail: format_ms(step.ms),
        };
        self.content = Some(content);
        self.position = Point::new(cursor.x + CURSOR_OFFSET, cursor.y + CURSOR_OFFSET);
        self.target_opacity = VISIBLE_OPACITY;
    }

    pub fn hide(&mut self) {
        self.target_opacity = 0.0;
    }

    /// Advance the fade by `dt` seconds. Returns `true` while still animating.
    pub fn tick(&mut self, dt: f32) -> bool {
        let step = VISIBLE_OPACITY * (dt / FADE_SECS);
        if self.opacity < self.target_opacity {
            self.opacity = (self.opacity + step).min(self.target_opacity);
        } else if self.opacity > self.target_opacity {
            self.opacity = (self.opacity - step).max(self.target_opacity);
        }
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        (self.opacity - self.target_opacity).abs() > f32::EPSILON
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Opacity the fade is heading to. Hosts with their own transitions
    /// (CSS) apply this directly instead of ticking.
    pub fn target_opacity(&self) -> f32 {
        self.target_opacity
    }

    /// Whether the tooltip should be drawn at all this frame.
    pub fn is_visible(&self) -> bool {
        self.content.is_some() && self.opacity > 0.0
    }
}
