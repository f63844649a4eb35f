//! Scenario selection: load, then render, and keep the resulting state.

use crate::format::load_error_text;
use crate::layout::LayoutConfig;
use crate::loader::{self, DataSource, LoadError};
use crate::model::{CollapseState, Scenario, ScenarioDataset};
use crate::views::{Diagram, render_swimlane};

/// What the diagram container currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramState {
    /// Nothing loaded yet.
    Empty,
    Ready {
        scenario: Scenario,
        dataset: ScenarioDataset,
        collapse: CollapseState,
        diagram: Diagram,
    },
    /// The last load failed; the container shows `message` instead of a diagram.
    Failed { scenario: Scenario, message: String },
}

impl DiagramState {
    pub fn diagram(&self) -> Option<&Diagram> {
        match self {
            Self::Ready { diagram, .. } => Some(diagram),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Handle for one in-flight load. Only the most recently issued token's
/// result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    id: u64,
    scenario: Scenario,
}

impl RequestToken {
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioController {
    config: LayoutConfig,
    selected: Scenario,
    status: Option<Scenario>,
    state: DiagramState,
    latest_request: u64,
}

impl Default for ScenarioController {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl ScenarioController {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            selected: Scenario::default(),
            status: None,
            state: DiagramState::Empty,
            latest_request: 0,
        }
    }

    /// Options for the selection control, in display order.
    pub fn scenarios(&self) -> &'static [Scenario] {
        &Scenario::ALL
    }

    pub fn selected(&self) -> Scenario {
        self.selected
    }

    /// Text of the status label: the last successfully loaded scenario.
    pub fn status_label(&self) -> Option<&'static str> {
        self.status.map(Scenario::name)
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Initial page load: show the default scenario without user input.
    pub fn initialize<S: DataSource + ?Sized>(&mut self, source: &S) -> &DiagramState {
        self.select(source, Scenario::default())
    }

    /// Load `scenario` from `source` and render it.
    pub fn select<S: DataSource + ?Sized>(
        &mut self,
        source: &S,
        scenario: Scenario,
    ) -> &DiagramState {
        let token = self.begin_request(scenario);
        let result = loader::load(source, scenario);
        self.finish_request(token, result);
        &self.state
    }

    /// Start a load for `scenario`. Supersedes every earlier token.
    pub fn begin_request(&mut self, scenario: Scenario) -> RequestToken {
        self.selected = scenario;
        self.latest_request += 1;
        RequestToken {
            id: self.latest_request,
            scenario,
        }
    }

    /// Apply the outcome of a load. Returns `false` (and changes nothing)
    /// when a newer request was issued after `token`.
    pub fn finish_request(
        &mut self,
        token: RequestToken,
        result: Result<ScenarioDataset, LoadError>,
    ) -> bool {
        let scenario = token.scenario;
        if token.id != self.latest_request {
            tracing::debug!(
                %scenario,
                selected = %self.selected,
                "dropping stale scenario response"
            );
            return false;
        }

        match result {
            Ok(dataset) => {
                let collapse = CollapseState::for_lanes(dataset.lane_names());
                let diagram = render_swimlane(&dataset, &collapse, &self.config);
                self.status = Some(scenario);
                self.state = DiagramState::Ready {
                    scenario,
                    dataset,
                    collapse,
                    diagram,
                };
            }
            Err(err) => {
                tracing::error!(%scenario, error = %err, "failed to load scenario dataset");
                self.state = DiagramState::Failed {
                    scenario,
                    message: load_error_text(&err),
                };
            }
        }
        true
    }

    /// Toggle a lane's step stack. Returns the new collapsed flag, or `None`
    /// if nothing is rendered or the lane does not exist.
    pub fn toggle_lane(&mut self, lane: &str) -> Option<bool> {
        let DiagramState::Ready {
            dataset,
            collapse,
            diagram,
            ..
        } = &mut self.state
        else {
            return None;
        };
        if !dataset.lanes.contains_key(lane) {
            return None;
        }
        let collapsed = collapse.toggle(lane);
        *diagram = render_swimlane(dataset, collapse, &self.config);
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use swimlane_protocol::RenderCommand;

    /// Serves documents from memory; unknown paths answer 404.
    #[derive(Default)]
    struct MemorySource {
        docs: HashMap<String, String>,
        fetched: RefCell<Vec<String>>,
    }

    impl MemorySource {
        fn with(mut self, scenario: Scenario, body: &str) -> Self {
            self.docs.insert(scenario.data_path(), body.to_string());
            self
        }
    }

    impl DataSource for MemorySource {
        fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
            self.fetched.borrow_mut().push(path.to_string());
            self.docs
                .get(path)
                .map(|b| b.as_bytes().to_vec())
                .ok_or_else(|| LoadError::Status {
                    path: path.to_string(),
                    status: 404,
                })
        }
    }

    const TYPICAL: &str = r#"{"lanes":{"Leader":[{"name":"Input","ms":5.0},{"name":"USB","ms":1.0}],
        "Video":[{"name":"Encode","ms":8.0}]},"totals":{"Leader":6.0,"Video":8.0},"overall":14.0}"#;
    const BEST: &str = r#"{"lanes":{"Leader":[{"name":"Input","ms":2.0}]},
        "totals":{"Leader":2.0},"overall":2.0}"#;

    fn source() -> MemorySource {
        MemorySource::default()
            .with(Scenario::Typical, TYPICAL)
            .with(Scenario::Best, BEST)
    }

    #[test]
    fn initial_load_uses_typical() {
        let src = source();
        let mut ctl = ScenarioController::default();
        assert_eq!(ctl.selected(), Scenario::Typical);
        assert_eq!(ctl.status_label(), None);

        ctl.initialize(&src);
        assert_eq!(*src.fetched.borrow(), ["data/latency_Typical.json"]);
        assert_eq!(ctl.status_label(), Some("Typical"));
        assert!(ctl.state().diagram().is_some());
    }

    #[test]
    fn scenario_options_in_order() {
        let ctl = ScenarioController::default();
        assert_eq!(
            ctl.scenarios(),
            &[Scenario::Best, Scenario::Typical, Scenario::Worst]
        );
    }

    #[test]
    fn failed_load_shows_error_and_no_diagram() {
        let src = source();
        let mut ctl = ScenarioController::default();
        ctl.initialize(&src);
        let state = ctl.select(&src, Scenario::Worst);

        assert!(state.diagram().is_none());
        let msg = state.error_message().unwrap_or_default();
        assert!(msg.starts_with("Failed to load data: "), "{msg}");
        assert!(msg.contains("404"), "{msg}");
        // Status label keeps the last successful scenario.
        assert_eq!(ctl.status_label(), Some("Typical"));
        assert_eq!(ctl.selected(), Scenario::Worst);
    }

    #[test]
    fn later_success_recovers() {
        let src = source();
        let mut ctl = ScenarioController::default();
        ctl.select(&src, Scenario::Worst);
        assert!(ctl.state().error_message().is_some());
        ctl.select(&src, Scenario::Best);
        assert!(ctl.state().diagram().is_some());
        assert_eq!(ctl.status_label(), Some("Best"));
    }

    #[test]
    fn reselect_replaces_diagram() {
        let src = source();
        let mut ctl = ScenarioController::default();
        ctl.initialize(&src);
        ctl.select(&src, Scenario::Best);
        let diagram = ctl.state().diagram().cloned().unwrap_or_else(|| Diagram {
            width: 0.0,
            height: 0.0,
            commands: Vec::new(),
        });
        let has_video = diagram.commands.iter().any(|c| {
            matches!(c, RenderCommand::DrawText { text, .. } if text.contains("Video"))
        });
        assert!(!has_video, "stale lane left over from previous render");
    }

    #[test]
    fn toggle_lane_twice_restores() {
        let src = source();
        let mut ctl = ScenarioController::default();
        ctl.initialize(&src);
        let before = ctl.state().clone();
        assert_eq!(ctl.toggle_lane("Leader"), Some(true));
        assert_ne!(ctl.state(), &before);
        assert_eq!(ctl.toggle_lane("Leader"), Some(false));
        assert_eq!(ctl.state(), &before);
        assert_eq!(ctl.toggle_lane("Nope"), None);
    }

    #[test]
    fn collapse_is_discarded_on_reload() {
        let src = source();
        let mut ctl = ScenarioController::default();
        ctl.initialize(&src);
        ctl.toggle_lane("Leader");
        ctl.select(&src, Scenario::Typical);
        match ctl.state() {
            DiagramState::Ready { collapse, .. } => assert!(!collapse.is_collapsed("Leader")),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut ctl = ScenarioController::default();
        let slow = ctl.begin_request(Scenario::Worst);
        let fast = ctl.begin_request(Scenario::Best);
        assert_eq!(slow.scenario(), Scenario::Worst);

        let best = loader::parse_dataset(BEST.as_bytes());
        assert!(ctl.finish_request(fast, best));
        let typical = loader::parse_dataset(TYPICAL.as_bytes());
        assert!(!ctl.finish_request(slow, typical));

        assert_eq!(ctl.status_label(), Some("Best"));
        assert_eq!(ctl.selected(), Scenario::Best);
    }

    #[test]
    fn toggle_without_diagram_is_noop() {
        let mut ctl = ScenarioController::default();
        assert_eq!(ctl.toggle_lane("Leader"), None);
        assert_eq!(ctl.state(), &DiagramState::Empty);
    }
}
