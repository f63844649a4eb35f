use swimlane_protocol::{HitTarget, Paint, RenderCommand, TextAlign, ThemeToken};

use crate::color::step_paint;
use crate::format::{format_ms, lane_header_text, title_text};
use crate::layout::{LayoutConfig, compute_layout};
use crate::model::{CollapseState, ScenarioDataset};

const TITLE_FONT_SIZE: f64 = 16.0;
const HEADER_FONT_SIZE: f64 = 14.0;
const STEP_FONT_SIZE: f64 = 12.0;
const PANEL_RADIUS: f64 = 10.0;
const STEP_RADIUS: f64 = 8.0;

/// A complete render: canvas size plus the command list that draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<RenderCommand>,
}

/// Group id of a lane.
pub fn lane_group_id(lane: &str) -> String {
    format!("lane:{lane}")
}

/// Group id of a lane's step stack (the part that collapses).
pub fn steps_group_id(lane: &str) -> String {
    format!("steps:{lane}")
}

/// Render the swimlane diagram for `dataset`.
///
/// Output order: title, then per lane its panel, header, step stack, and
/// connector arrows. A collapsed lane still emits its step stack, inside a
/// hidden group, so geometry never depends on collapse state.
pub fn render_swimlane(
    dataset: &ScenarioDataset,
    collapse: &CollapseState,
    config: &LayoutConfig,
) -> Diagram {
    let layout = compute_layout(dataset, config);
    let step_count: usize = dataset.lanes.values().map(Vec::len).sum();
    let mut commands = Vec::with_capacity(2 + dataset.lanes.len() * 8 + step_count * 4);

    commands.push(RenderCommand::DrawText {
        position: layout.title_anchor,
        text: title_text(dataset.overall),
        color: ThemeToken::TitleText,
        font_size: TITLE_FONT_SIZE,
        strong: true,
        align: TextAlign::Center,
    });

    for lane in &layout.lanes {
        let steps = dataset
            .lanes
            .get(&lane.name)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let total = dataset.lane_total(&lane.name).unwrap_or_default();

        commands.push(RenderCommand::BeginGroup {
            id: lane_group_id(&lane.name),
            label: Some(lane.name.clone()),
            hidden: false,
        });

        commands.push(RenderCommand::DrawRect {
            rect: lane.panel,
            paint: Paint::Theme(ThemeToken::LaneBackground),
            border_color: Some(ThemeToken::LaneBorder),
            corner_radius: PANEL_RADIUS,
            label: None,
            target: None,
        });

        let header_text = lane_header_text(&lane.name, total);
        commands.push(RenderCommand::DrawRect {
            rect: lane.header,
            paint: Paint::Theme(ThemeToken::LaneHeaderBackground),
            border_color: None,
            corner_radius: PANEL_RADIUS,
            label: Some(header_text.clone()),
            target: Some(HitTarget::LaneHeader {
                lane: lane.name.clone(),
            }),
        });
        commands.push(RenderCommand::DrawText {
            position: lane.header_anchor,
            text: header_text,
            color: ThemeToken::LaneHeaderText,
            font_size: HEADER_FONT_SIZE,
            strong: true,
            align: TextAlign::Left,
        });

        commands.push(RenderCommand::BeginGroup {
            id: steps_group_id(&lane.name),
            label: None,
            hidden: collapse.is_collapsed(&lane.name),
        });
        for (index, (step, geom)) in steps.iter().zip(&lane.steps).enumerate() {
            let value = format_ms(step.ms);
            commands.push(RenderCommand::DrawRect {
                rect: geom.rect,
                paint: step_paint(step),
                border_color: Some(ThemeToken::StepBorder),
                corner_radius: STEP_RADIUS,
                label: Some(format!("{}: {value}", step.name)),
                target: Some(HitTarget::Step {
                    lane: lane.name.clone(),
                    index,
                }),
            });
            commands.push(RenderCommand::DrawText {
                position: geom.name_anchor,
                text: step.name.clone(),
                color: ThemeToken::StepText,
                font_size: STEP_FONT_SIZE,
                strong: false,
                align: TextAlign::Left,
            });
            commands.push(RenderCommand::DrawText {
                position: geom.value_anchor,
                text: value,
                color: ThemeToken::StepValueText,
                font_size: STEP_FONT_SIZE,
                strong: false,
                align: TextAlign::Right,
            });
        }
        commands.push(RenderCommand::EndGroup);

        // Arrows live outside the step group, as in the lane panel itself.
        for (from, to) in &lane.connectors {
            commands.push(RenderCommand::DrawArrow {
                from: *from,
                to: *to,
                color: ThemeToken::Connector,
                width: 1.0,
            });
        }

        commands.push(RenderCommand::EndGroup);
    }

    tracing::debug!(
        lanes = layout.lanes.len(),
        commands = commands.len(),
        "rendered swimlane"
    );

    Diagram {
        width: layout.width,
        height: layout.height,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Step;
    use indexmap::IndexMap;
    use swimlane_protocol::Color;

    fn single_step() -> ScenarioDataset {
        let mut lanes = IndexMap::new();
        lanes.insert("Leader".to_string(), vec![Step::new("Input", 5.0)]);
        let mut totals = IndexMap::new();
        totals.insert("Leader".to_string(), 5.0);
        ScenarioDataset {
            lanes,
            totals,
            overall: 5.0,
        }
    }

    fn two_lanes() -> ScenarioDataset {
        let mut lanes = IndexMap::new();
        lanes.insert(
            "Leader".to_string(),
            vec![
                Step::new("Sampling", 1.0).with_color("#E2EFDA"),
                Step::new("USB", 0.42),
                Step::new("Packetize", 0.5),
            ],
        );
        lanes.insert("Network".to_string(), vec![Step::new("One-way", 18.75)]);
        let mut totals = IndexMap::new();
        totals.insert("Leader".to_string(), 1.92);
        totals.insert("Network".to_string(), 18.75);
        ScenarioDataset {
            lanes,
            totals,
            overall: 20.67,
        }
    }

    fn texts(cmds: &[RenderCommand]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn step_rects(cmds: &[RenderCommand]) -> Vec<&RenderCommand> {
        cmds.iter()
            .filter(|c| {
                matches!(
                    c,
                    RenderCommand::DrawRect {
                        target: Some(HitTarget::Step { .. }),
                        ..
                    }
                )
            })
            .collect()
    }

    #[test]
    fn single_step_diagram() {
        let ds = single_step();
        let d = render_swimlane(&ds, &CollapseState::default(), &LayoutConfig::default());
        let t = texts(&d.commands);
        assert_eq!(t[0], "Overall Command→Photon: 5.0 ms");
        assert_eq!(step_rects(&d.commands).len(), 1);
        assert_eq!(t.iter().filter(|s| **s == "Input").count(), 1);
        assert_eq!(t.iter().filter(|s| **s == "5.0 ms").count(), 1);
        assert!(t.contains(&"Leader (total 5.0 ms)"));
    }

    #[test]
    fn durations_have_one_decimal() {
        let d = render_swimlane(&two_lanes(), &CollapseState::default(), &LayoutConfig::default());
        let t = texts(&d.commands);
        assert!(t.contains(&"0.4 ms"));
        assert!(t.contains(&"18.8 ms") || t.contains(&"18.7 ms"));
        assert!(t.contains(&"Overall Command→Photon: 20.7 ms"));
    }

    #[test]
    fn arrows_only_within_lanes() {
        let d = render_swimlane(&two_lanes(), &CollapseState::default(), &LayoutConfig::default());
        let arrows = d
            .commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawArrow { .. }))
            .count();
        assert_eq!(arrows, 2);
    }

    #[test]
    fn step_colors_and_default_fill() {
        let d = render_swimlane(&two_lanes(), &CollapseState::default(), &LayoutConfig::default());
        let paints: Vec<Paint> = step_rects(&d.commands)
            .into_iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { paint, .. } => Some(*paint),
                _ => None,
            })
            .collect();
        assert_eq!(paints[0], Paint::Custom(Color::rgb8(0xe2, 0xef, 0xda)));
        assert_eq!(paints[1], Paint::Theme(ThemeToken::StepFill));
    }

    #[test]
    fn collapse_hides_only_that_lane() {
        let ds = two_lanes();
        let cfg = LayoutConfig::default();
        let mut collapse = CollapseState::for_lanes(ds.lane_names());
        let expanded = render_swimlane(&ds, &collapse, &cfg);
        collapse.toggle("Leader");
        let collapsed = render_swimlane(&ds, &collapse, &cfg);

        let hidden: Vec<&str> = collapsed
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::BeginGroup { id, hidden: true, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(hidden, ["steps:Leader"]);
        assert_eq!(expanded.commands.len(), collapsed.commands.len());
        assert_eq!((expanded.width, expanded.height), (collapsed.width, collapsed.height));
    }

    #[test]
    fn lane_panels_are_outlined() {
        let d = render_swimlane(&two_lanes(), &CollapseState::default(), &LayoutConfig::default());
        let borders: Vec<Option<ThemeToken>> = d
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect {
                    paint: Paint::Theme(ThemeToken::LaneBackground),
                    border_color,
                    ..
                } => Some(*border_color),
                _ => None,
            })
            .collect();
        assert_eq!(borders, vec![Some(ThemeToken::LaneBorder); 2]);
    }

    #[test]
    fn groups_are_balanced() {
        let d = render_swimlane(&two_lanes(), &CollapseState::default(), &LayoutConfig::default());
        let mut depth = 0i32;
        for c in &d.commands {
            match c {
                RenderCommand::BeginGroup { .. } => depth += 1,
                RenderCommand::EndGroup => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0);
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn rerender_is_deterministic() {
        let ds = two_lanes();
        let cfg = LayoutConfig::default();
        let a = render_swimlane(&ds, &CollapseState::default(), &cfg);
        let b = render_swimlane(&ds, &CollapseState::default(), &cfg);
        assert_eq!(a, b);
    }
}
