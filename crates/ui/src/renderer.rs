use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Shape, Stroke, StrokeKind};
use swimlane_core::views::visible_commands;
use swimlane_protocol::{RenderCommand, TextAlign};

use crate::theme::{self, ThemeMode};

const ARROW_HEAD: f32 = 6.0;

fn radius(r: f64) -> CornerRadius {
    CornerRadius::same(r.clamp(0.0, 255.0) as u8)
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the diagram. Hidden groups are
/// skipped entirely.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    let at = |x: f64, y: f64| Pos2::new(x as f32 + offset.x, y as f32 + offset.y);

    for cmd in visible_commands(commands) {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                paint,
                border_color,
                corner_radius,
                ..
            } => {
                let egui_rect =
                    Rect::from_min_size(at(rect.x, rect.y), egui::vec2(rect.w as f32, rect.h as f32));

                // Cull off-screen
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }

                let fill = theme::resolve_paint(*paint, mode);
                painter.rect_filled(egui_rect, radius(*corner_radius), fill);

                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        radius(*corner_radius),
                        Stroke::new(1.0, theme::resolve(*bc, mode)),
                        StrokeKind::Inside,
                    );
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                strong,
                align,
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                // Positions are baselines; nudge down by the descent.
                let pos = at(position.x, position.y) + egui::vec2(0.0, size * 0.25);
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_BOTTOM,
                    TextAlign::Center => Align2::CENTER_BOTTOM,
                    TextAlign::Right => Align2::RIGHT_BOTTOM,
                };
                let text_color = theme::resolve(*color, mode);
                painter.text(pos, anchor, text, FontId::proportional(size), text_color);
                if *strong {
                    // Faux bold: egui's default fonts have a single weight.
                    painter.text(
                        pos + egui::vec2(0.5, 0.0),
                        anchor,
                        text,
                        FontId::proportional(size),
                        text_color,
                    );
                }
            }

            RenderCommand::DrawArrow {
                from,
                to,
                color,
                width,
            } => {
                let line_color = theme::resolve(*color, mode);
                let p1 = at(from.x, from.y);
                let p2 = at(to.x, to.y);
                painter.line_segment([p1, p2], Stroke::new(*width as f32, line_color));

                let dir = (p2 - p1).normalized();
                if dir.is_finite() {
                    let normal = egui::vec2(-dir.y, dir.x);
                    let base = p2 - dir * ARROW_HEAD;
                    painter.add(Shape::convex_polygon(
                        vec![
                            p2,
                            base + normal * (ARROW_HEAD / 2.0),
                            base - normal * (ARROW_HEAD / 2.0),
                        ],
                        line_color,
                        Stroke::NONE,
                    ));
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups are semantic; hidden ones were already filtered out.
            }
        }
    }
}
