//! Hit-testing over a render-command list.

use swimlane_protocol::{HitTarget, Point, Rect, RenderCommand};

use crate::views::visible_commands;

/// The interactive element under `point`, if any.
///
/// Later commands paint over earlier ones, so the last matching rect wins.
/// Anything inside a hidden group is ignored.
pub fn hit_test(commands: &[RenderCommand], point: Point) -> Option<&HitTarget> {
    visible_commands(commands)
        .filter_map(|cmd| match cmd {
            RenderCommand::DrawRect {
                rect,
                target: Some(target),
                ..
            } if rect.contains(point) => Some(target),
            _ => None,
        })
        .last()
}

/// Bounds of the visible rect carrying `target`, for highlighting or
/// scrolling it into view.
pub fn target_rect(commands: &[RenderCommand], target: &HitTarget) -> Option<Rect> {
    visible_commands(commands).find_map(|cmd| match cmd {
        RenderCommand::DrawRect {
            rect,
            target: Some(t),
            ..
        } if t == target => Some(*rect),
        _ => None,
    })
}
