//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use swimlane_protocol::{HitTarget, Paint, RenderCommand, TextAlign, ThemeToken};

/// Id of the arrowhead marker referenced by connector lines.
pub const ARROW_MARKER_ID: &str = "arrow";

/// Render a list of commands as an SVG document string.
///
/// Interactive rects carry `data-lane` (and `data-step` for steps) so a host
/// page can bind hover and click handlers; step rects also get a `<title>`
/// for viewers without a script.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 160 + 512);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );

    let connector = resolve_color(ThemeToken::Connector);
    let _ = write!(
        svg,
        r#"<defs><marker id="{ARROW_MARKER_ID}" markerWidth="10" markerHeight="10" refX="6" refY="3" orient="auto"><path d="M0,0 L0,6 L6,3 z" fill="{connector}"/></marker></defs>"#,
    );

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                paint,
                border_color,
                corner_radius,
                label,
                target,
            } => {
                let fill = paint_color(*paint);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{corner_radius}" fill="{fill}""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(bc) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, resolve_color(*bc));
                }
                match target {
                    Some(HitTarget::Step { lane, index }) => {
                        let _ = write!(
                            svg,
                            r#" class="step" data-lane="{}" data-step="{index}""#,
                            escape_xml(lane),
                        );
                    }
                    Some(HitTarget::LaneHeader { lane }) => {
                        let _ = write!(
                            svg,
                            r#" class="lane-header" data-lane="{}" style="cursor:pointer""#,
                            escape_xml(lane),
                        );
                    }
                    None => {}
                }
                match (label, target) {
                    (Some(label), Some(HitTarget::Step { .. })) => {
                        let _ = write!(svg, "><title>{}</title></rect>", escape_xml(label));
                    }
                    _ => svg.push_str("/>"),
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
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let weight = if *strong { r#" font-weight="600""# } else { "" };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}px" text-anchor="{anchor}"{weight} style="pointer-events:none">{}</text>"#,
                    position.x,
                    position.y,
                    resolve_color(*color),
                    escape_xml(text),
                );
            }
            RenderCommand::DrawArrow {
                from,
                to,
                color,
                width: line_width,
            } => {
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}" marker-end="url(#{ARROW_MARKER_ID})"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    resolve_color(*color),
                );
            }
            RenderCommand::BeginGroup { id, hidden, .. } => {
                let display = if *hidden { r#" display="none""# } else { "" };
                let _ = write!(svg, r#"<g data-group="{}"{display}>"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn paint_color(paint: Paint) -> String {
    match paint {
        Paint::Theme(token) => resolve_color(token).to_string(),
        Paint::Custom(color) => color.to_hex(),
    }
}

/// Light palette used for static export.
pub fn resolve_color(token: ThemeToken) -> &'static str {
    match token {
        ThemeToken::Background | ThemeToken::StepFill => "#ffffff",
        ThemeToken::TitleText | ThemeToken::StepText | ThemeToken::LaneHeaderText => "#1a1a2e",
        ThemeToken::StepValueText => "#555566",
        ThemeToken::LaneBackground => "#f0f0f0",
        ThemeToken::LaneHeaderBackground => "#e4e4ea",
        ThemeToken::LaneBorder => "#d0d0d8",
        ThemeToken::StepBorder => "#999999",
        ThemeToken::Connector => "#bbbbbb",
        ThemeToken::HoverHighlight => "#ffd60a",
        ThemeToken::TooltipBackground => "#222233",
        ThemeToken::TooltipText => "#ffffff",
        ThemeToken::ErrorText => "#c0392b",
    }
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
