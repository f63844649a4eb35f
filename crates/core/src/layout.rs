//! Diagram geometry.
//!
//! All lanes share one vertical grid sized to the longest lane. Step boxes
//! have a uniform height; a step's duration never affects its size.

use serde::{Deserialize, Serialize};
use swimlane_protocol::{Point, Rect};

use crate::model::ScenarioDataset;

/// Baseline of the text inside a step box, from the box top.
const STEP_TEXT_BASELINE: f64 = 22.0;
/// Left padding of the step name inside its box.
const STEP_NAME_X: f64 = 12.0;
/// Right padding of the duration text, measured from the lane's right edge.
const STEP_VALUE_RIGHT: f64 = 32.0;
/// Baseline of the lane header text, from the lane top.
const HEADER_BASELINE: f64 = 24.0;
/// Baseline of the diagram title, from the canvas top.
const TITLE_BASELINE: f64 = 18.0;

/// Fixed diagram metrics, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub lane_width: f64,
    pub lane_gap: f64,
    pub step_height: f64,
    pub header_height: f64,
    pub padding: f64,
    /// Extra vertical room reserved for the title band.
    pub title_band: f64,
    /// Distance from the padded frame's top to the lane panels.
    pub lane_top: f64,
    /// Horizontal inset of the step stack inside its lane panel.
    pub step_inset: f64,
    /// Vertical gap left free at the bottom of each step cell.
    pub step_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lane_width: 320.0,
            lane_gap: 40.0,
            step_height: 62.0,
            header_height: 40.0,
            padding: 20.0,
            title_band: 60.0,
            lane_top: 30.0,
            step_inset: 10.0,
            step_gap: 10.0,
        }
    }
}

impl LayoutConfig {
    pub fn canvas_width(&self, lane_count: usize) -> f64 {
        let lanes = if lane_count == 0 {
            0.0
        } else {
            lane_count as f64 * (self.lane_width + self.lane_gap) - self.lane_gap
        };
        self.padding * 2.0 + lanes
    }

    /// Depends only on the longest lane.
    pub fn canvas_height(&self, max_steps: usize) -> f64 {
        self.padding * 2.0
            + max_steps as f64 * self.step_height
            + self.header_height
            + self.title_band
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepLayout {
    pub rect: Rect,
    pub name_anchor: Point,
    pub value_anchor: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneLayout {
    pub name: String,
    /// Background panel; the same height for every lane.
    pub panel: Rect,
    /// Clickable header band at the top of the panel.
    pub header: Rect,
    pub header_anchor: Point,
    pub steps: Vec<StepLayout>,
    /// Arrow segments between consecutive steps, top to bottom.
    pub connectors: Vec<(Point, Point)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout {
    pub width: f64,
    pub height: f64,
    pub title_anchor: Point,
    pub lanes: Vec<LaneLayout>,
}

/// Compute the geometry for `dataset`. Pure: the same input always yields
/// the same layout.
pub fn compute_layout(dataset: &ScenarioDataset, config: &LayoutConfig) -> DiagramLayout {
    let max_steps = dataset.max_steps();
    let width = config.canvas_width(dataset.lanes.len());
    let height = config.canvas_height(max_steps);
    let panel_height = max_steps as f64 * config.step_height + config.header_height;
    let top = config.padding + config.lane_top;

    let lanes = dataset
        .lanes
        .iter()
        .enumerate()
        .map(|(li, (name, steps))| {
            let x = config.padding + li as f64 * (config.lane_width + config.lane_gap);
            let stack_x = x + config.step_inset;
            let stack_y = top + config.header_height;

            let step_rows: Vec<StepLayout> = (0..steps.len())
                .map(|i| {
                    let y = stack_y + i as f64 * config.step_height;
                    StepLayout {
                        rect: Rect::new(
                            stack_x,
                            y,
                            config.lane_width - 2.0 * config.step_inset,
                            config.step_height - config.step_gap,
                        ),
                        name_anchor: Point::new(stack_x + STEP_NAME_X, y + STEP_TEXT_BASELINE),
                        value_anchor: Point::new(
                            stack_x + config.lane_width - STEP_VALUE_RIGHT,
                            y + STEP_TEXT_BASELINE,
                        ),
                    }
                })
                .collect();

            let connector_x = x + config.lane_width - config.step_inset;
            let row_mid = |i: usize| {
                stack_y + i as f64 * config.step_height + config.step_height / 2.0
                    - config.step_gap / 2.0
            };
            let connectors = (1..steps.len())
                .map(|i| {
                    (
                        Point::new(connector_x, row_mid(i - 1)),
                        Point::new(connector_x, row_mid(i)),
                    )
                })
                .collect();

            LaneLayout {
                name: name.clone(),
                panel: Rect::new(x, top, config.lane_width, panel_height),
                header: Rect::new(x, top, config.lane_width, config.header_height),
                header_anchor: Point::new(stack_x, top + HEADER_BASELINE),
                steps: step_rows,
                connectors,
            }
        })
        .collect();

    DiagramLayout {
        width,
        height,
        title_anchor: Point::new(width / 2.0, TITLE_BASELINE),
        lanes,
    }
}
