//! Integration test: serve the published scenario files from a directory,
//! drive the controller through selection changes, and check the rendered
//! diagram and its SVG export.

use swimlane_core::hit::hit_test;
use swimlane_core::loader::parse_dataset;
use swimlane_core::svg::render_svg;
use swimlane_core::{DirSource, LayoutConfig, Scenario, ScenarioController};
use swimlane_protocol::{HitTarget, Point, RenderCommand};

const TYPICAL: &[u8] = include_bytes!("fixtures/latency_Typical.json");
const BEST: &[u8] = include_bytes!("fixtures/latency_Best.json");

/// Site root with Best and Typical published; Worst is missing.
fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).expect("mkdir data");
    std::fs::write(data.join("latency_Typical.json"), TYPICAL).expect("write typical");
    std::fs::write(data.join("latency_Best.json"), BEST).expect("write best");
    dir
}

fn count_steps(commands: &[RenderCommand]) -> usize {
    commands
        .iter()
        .filter(|c| {
            matches!(
                c,
                RenderCommand::DrawRect {
                    target: Some(HitTarget::Step { .. }),
                    ..
                }
            )
        })
        .count()
}

#[test]
fn fixtures_are_valid_datasets() {
    let typical = parse_dataset(TYPICAL).expect("typical fixture");
    let lanes: Vec<_> = typical.lane_names().collect();
    assert_eq!(lanes, ["Leader", "Network", "Follower", "Video"]);
    assert_eq!(typical.max_steps(), 12);

    let best = parse_dataset(BEST).expect("best fixture");
    assert!(best.overall < typical.overall);
}

#[test]
fn select_cycle_over_directory() {
    let dir = site();
    let source = DirSource::new(dir.path());
    let mut ctl = ScenarioController::default();

    // Initial page load.
    let state = ctl.initialize(&source);
    let diagram = state.diagram().expect("typical renders");
    assert_eq!(count_steps(&diagram.commands), 6 + 1 + 8 + 12);
    let cfg = LayoutConfig::default();
    assert_eq!(diagram.height, cfg.canvas_height(12));
    assert_eq!(ctl.status_label(), Some("Typical"));

    // Missing file: error text, no diagram.
    let state = ctl.select(&source, Scenario::Worst);
    assert!(state.diagram().is_none());
    let msg = state.error_message().expect("error message");
    assert!(msg.starts_with("Failed to load data:"), "{msg}");
    assert!(msg.contains("latency_Worst.json"), "{msg}");

    // Recovery.
    let state = ctl.select(&source, Scenario::Best);
    assert!(state.diagram().is_some());
    assert_eq!(ctl.status_label(), Some("Best"));
}

#[test]
fn svg_export_reflects_collapse() {
    let dir = site();
    let source = DirSource::new(dir.path());
    let mut ctl = ScenarioController::default();
    ctl.initialize(&source);

    let diagram = ctl.state().diagram().expect("diagram").clone();
    let svg = render_svg(&diagram.commands, diagram.width, diagram.height);
    assert!(svg.contains("Overall Command→Photon: 131.8 ms"));
    assert!(svg.contains("Video (total 87.3 ms)"));
    assert!(!svg.contains("display=\"none\""));

    // Click on the Video header, found through hit-testing.
    let video_header = diagram
        .commands
        .iter()
        .find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                target: Some(HitTarget::LaneHeader { lane }),
                ..
            } if lane == "Video" => Some(rect.center()),
            _ => None,
        })
        .expect("video header");
    let target = hit_test(&diagram.commands, video_header).cloned();
    assert_eq!(
        target,
        Some(HitTarget::LaneHeader {
            lane: "Video".into()
        })
    );

    assert_eq!(ctl.toggle_lane("Video"), Some(true));
    let collapsed = ctl.state().diagram().expect("diagram");
    assert_eq!(
        (collapsed.width, collapsed.height),
        (diagram.width, diagram.height)
    );
    let svg = render_svg(&collapsed.commands, collapsed.width, collapsed.height);
    assert!(svg.contains("<g data-group=\"steps:Video\" display=\"none\">"));
    assert_eq!(svg.matches("display=\"none\"").count(), 1);

    // A step of the collapsed lane can no longer be hovered.
    let last_video_step = Point::new(video_header.x, diagram.height - 80.0);
    assert!(!matches!(
        hit_test(&collapsed.commands, last_video_step),
        Some(HitTarget::Step { .. })
    ));
}
