use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use swimlane_core::hit::{hit_test, target_rect};
use swimlane_core::tooltip::Tooltip;
use swimlane_core::views::visible_commands;
use swimlane_core::{DiagramState, DirSource, Scenario, ScenarioController};
use swimlane_protocol::{HitTarget, Paint, Point, RenderCommand, TextAlign, ThemeToken};

/// Diagram units per terminal row. A step box spans roughly three rows.
const ROW_UNITS: f64 = 62.0 / 3.0;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::TitleText => Color::White,
        ThemeToken::LaneBackground => Color::Rgb(24, 24, 32),
        ThemeToken::LaneBorder => Color::DarkGray,
        ThemeToken::LaneHeaderBackground => Color::DarkGray,
        ThemeToken::LaneHeaderText => Color::White,
        ThemeToken::StepFill => Color::Gray,
        ThemeToken::StepBorder => Color::DarkGray,
        ThemeToken::StepText => Color::Black,
        ThemeToken::StepValueText => Color::Black,
        ThemeToken::Connector => Color::Gray,
        ThemeToken::HoverHighlight => Color::LightYellow,
        ThemeToken::TooltipBackground => Color::DarkGray,
        ThemeToken::TooltipText => Color::White,
        ThemeToken::ErrorText => Color::LightRed,
    }
}

fn paint_to_color(paint: Paint) -> Color {
    match paint {
        Paint::Theme(token) => theme_to_color(token),
        Paint::Custom(color) => {
            let [r, g, b, _] = color.to_rgba8();
            Color::Rgb(r, g, b)
        }
    }
}

/// Maps diagram coordinates onto terminal cells inside `area`.
#[derive(Debug, Clone, Copy)]
struct CellMap {
    area: Rect,
    col_scale: f64,
    scroll: u16,
}

impl CellMap {
    fn new(area: Rect, diagram_width: f64, scroll: u16) -> Self {
        let col_scale = if diagram_width > 0.0 {
            f64::from(area.width) / diagram_width
        } else {
            1.0
        };
        Self {
            area,
            col_scale,
            scroll,
        }
    }

    /// Diagram-space column and row, before clipping and scrolling.
    fn cell(&self, p: Point) -> (i32, i32) {
        (
            (p.x * self.col_scale).floor() as i32,
            (p.y / ROW_UNITS).floor() as i32,
        )
    }

    /// Absolute terminal position of a diagram-space cell, if on screen.
    fn screen(&self, col: i32, row: i32) -> Option<(u16, u16)> {
        let row = row - i32::from(self.scroll);
        if col < 0
            || row < 0
            || col >= i32::from(self.area.width)
            || row >= i32::from(self.area.height)
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Center of the terminal cell at (`x`, `y`) in diagram coordinates.
    fn to_point(&self, x: u16, y: u16) -> Option<Point> {
        if x < self.area.x
            || y < self.area.y
            || x >= self.area.x + self.area.width
            || y >= self.area.y + self.area.height
        {
            return None;
        }
        let col = f64::from(x - self.area.x) + 0.5;
        let row = f64::from(y - self.area.y + self.scroll) + 0.5;
        Some(Point::new(col / self.col_scale, row * ROW_UNITS))
    }
}

fn fill_rect(buf: &mut Buffer, map: &CellMap, rect: swimlane_protocol::Rect, style: Style) {
    let (c0, r0) = map.cell(Point::new(rect.x, rect.y));
    let (c1, r1) = map.cell(Point::new(rect.right(), rect.bottom()));
    for row in r0..r1.max(r0 + 1) {
        for col in c0..c1.max(c0 + 1) {
            if let Some(pos) = map.screen(col, row) {
                buf[pos].set_char(' ').set_style(style);
            }
        }
    }
}

fn put_text(buf: &mut Buffer, map: &CellMap, col: i32, row: i32, text: &str, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        if let Some(pos) = map.screen(col + i as i32, row) {
            buf[pos].set_char(ch).set_style(style);
        }
    }
}

fn draw_commands(
    buf: &mut Buffer,
    map: &CellMap,
    commands: &[RenderCommand],
    focus: Option<&HitTarget>,
) {
    for cmd in visible_commands(commands) {
        match cmd {
            RenderCommand::DrawRect {
                rect, paint, target, ..
            } => {
                let bg = if target.is_some() && target.as_ref() == focus {
                    theme_to_color(ThemeToken::HoverHighlight)
                } else {
                    paint_to_color(*paint)
                };
                fill_rect(buf, map, *rect, Style::default().bg(bg));
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                strong,
                align,
            } => {
                // Baselines sit below the glyph center.
                let anchor = Point::new(position.x, position.y - font_size * 0.35);
                let (col, row) = map.cell(anchor);
                let len = text.chars().count() as i32;
                let col = match align {
                    TextAlign::Left => col,
                    TextAlign::Center => col - len / 2,
                    TextAlign::Right => col - len,
                };
                let mut style = Style::default().fg(theme_to_color(*color));
                if *strong {
                    style = style.add_modifier(Modifier::BOLD);
                }
                put_text(buf, map, col, row, text, style);
            }
            RenderCommand::DrawArrow { from, to, color, .. } => {
                let (col, r0) = map.cell(*from);
                let (_, r1) = map.cell(*to);
                let fg = theme_to_color(*color);
                for row in r0..r1 {
                    if let Some(pos) = map.screen(col, row) {
                        buf[pos].set_char('│').set_fg(fg);
                    }
                }
                if let Some(pos) = map.screen(col, r1) {
                    buf[pos].set_char('▼').set_fg(fg);
                }
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

/// Keyboard focus: a lane, and a step within it while the lane is expanded.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Focus {
    lane: usize,
    step: usize,
}

struct TuiState<'a> {
    controller: &'a mut ScenarioController,
    source: &'a DirSource,
    focus: Focus,
    scroll: u16,
    tooltip: Tooltip,
}

impl<'a> TuiState<'a> {
    fn new(controller: &'a mut ScenarioController, source: &'a DirSource) -> Self {
        Self {
            controller,
            source,
            focus: Focus::default(),
            scroll: 0,
            tooltip: Tooltip::new(),
        }
    }

    fn select(&mut self, scenario: Scenario) {
        self.controller.select(self.source, scenario);
        self.focus = Focus::default();
        self.scroll = 0;
    }

    fn cycle_scenario(&mut self, delta: isize) {
        let all = Scenario::ALL;
        let current = all
            .iter()
            .position(|s| *s == self.controller.selected())
            .unwrap_or(0);
        let next = (current as isize + delta).rem_euclid(all.len() as isize) as usize;
        self.select(all[next]);
    }

    /// Name of the focused lane and whether its steps are shown.
    fn focused_lane(&self) -> Option<(&str, bool)> {
        let DiagramState::Ready {
            dataset, collapse, ..
        } = self.controller.state()
        else {
            return None;
        };
        let name = dataset.lane_names().nth(self.focus.lane)?;
        Some((name, !collapse.is_collapsed(name)))
    }

    fn focus_target(&self) -> Option<HitTarget> {
        let (lane, expanded) = self.focused_lane()?;
        if expanded {
            Some(HitTarget::Step {
                lane: lane.to_string(),
                index: self.focus.step,
            })
        } else {
            Some(HitTarget::LaneHeader {
                lane: lane.to_string(),
            })
        }
    }

    fn move_lane(&mut self, delta: isize) {
        let DiagramState::Ready { dataset, .. } = self.controller.state() else {
            return;
        };
        let count = dataset.lanes.len();
        if count == 0 {
            return;
        }
        let lane = (self.focus.lane as isize + delta).clamp(0, count as isize - 1) as usize;
        let steps = dataset.lanes.get_index(lane).map_or(0, |(_, s)| s.len());
        self.focus = Focus {
            lane,
            step: self.focus.step.min(steps.saturating_sub(1)),
        };
    }

    fn move_step(&mut self, delta: isize) {
        let DiagramState::Ready { dataset, .. } = self.controller.state() else {
            return;
        };
        let steps = dataset
            .lanes
            .get_index(self.focus.lane)
            .map_or(0, |(_, s)| s.len());
        if steps == 0 {
            return;
        }
        self.focus.step = (self.focus.step as isize + delta).clamp(0, steps as isize - 1) as usize;
    }

    fn toggle_focused_lane(&mut self) {
        let Some(lane) = self.focused_lane().map(|(lane, _)| lane.to_string()) else {
            return;
        };
        self.controller.toggle_lane(&lane);
    }

    /// Point the focus at whatever the mouse is over.
    fn focus_on(&mut self, target: &HitTarget) {
        let DiagramState::Ready { dataset, .. } = self.controller.state() else {
            return;
        };
        let Some(lane) = dataset.lanes.get_index_of(target.lane()) else {
            return;
        };
        self.focus.lane = lane;
        if let HitTarget::Step { index, .. } = target {
            self.focus.step = *index;
        }
    }

    /// Refresh the tooltip from the focused step; it is hidden otherwise.
    fn sync_tooltip(&mut self) {
        let step = match (self.controller.state(), self.focus_target()) {
            (DiagramState::Ready { dataset, .. }, Some(HitTarget::Step { lane, index })) => {
                dataset.step(&lane, index).cloned()
            }
            _ => None,
        };
        match step {
            Some(step) => self.tooltip.show(&step, Point::new(0.0, 0.0)),
            None => self.tooltip.hide(),
        }
    }

    /// Keep the focused step within `rows` visible rows.
    fn scroll_to_focus(&mut self, rows: u16) {
        let Some(diagram) = self.controller.state().diagram() else {
            return;
        };
        let Some(target) = self.focus_target() else {
            return;
        };
        let Some(rect) = target_rect(&diagram.commands, &target) else {
            return;
        };
        let top = (rect.y / ROW_UNITS).floor().max(0.0) as u16;
        let bottom = (rect.bottom() / ROW_UNITS).ceil().max(0.0) as u16;
        if top < self.scroll {
            self.scroll = top;
        } else if bottom > self.scroll + rows {
            self.scroll = bottom.saturating_sub(rows);
        }
    }

    fn status_line(&self) -> (String, Color) {
        if let Some(message) = self.controller.state().error_message() {
            return (format!(" {message}"), theme_to_color(ThemeToken::ErrorText));
        }
        let showing = self.controller.status_label().unwrap_or("-");
        // Cells cannot fade, so a requested tooltip shows at once.
        let shown = self
            .tooltip
            .content()
            .filter(|_| self.tooltip.target_opacity() > 0.0);
        let detail = match (shown, self.focused_lane()) {
            (Some(c), _) => format!(" | {}: {}", c.title, c.detail),
            (None, Some((lane, false))) => format!(" | {lane} (collapsed)"),
            (None, Some((lane, true))) => format!(" | {lane}"),
            (None, None) => String::new(),
        };
        (format!(" Showing: {showing}{detail}"), Color::White)
    }
}

pub fn render_tui(controller: &mut ScenarioController, source: &DirSource) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = TuiState::new(controller, source);

    loop {
        let term_size = terminal.size()?;
        let content_area = Rect::new(0, 1, term_size.width, term_size.height.saturating_sub(2));
        state.sync_tooltip();
        state.scroll_to_focus(content_area.height);

        let width = state.controller.state().diagram().map_or(0.0, |d| d.width);
        let map = CellMap::new(content_area, width, state.scroll);
        let focus = state.focus_target();
        let (status, status_fg) = state.status_line();

        terminal.draw(|frame| {
            let area = frame.area();

            // Header
            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " swimlane: {} | 1-3/tab scenario | ←→↑↓ focus | enter collapse | q quit ",
                    state.controller.selected()
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let block = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(theme_to_color(ThemeToken::Background)));
            frame.render_widget(block, content_area);

            if let Some(diagram) = state.controller.state().diagram() {
                draw_commands(frame.buffer_mut(), &map, &diagram.commands, focus.as_ref());
            }

            let status_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
            let status_bar = Block::default()
                .title(status.as_str())
                .style(Style::default().fg(status_fg).bg(Color::DarkGray));
            frame.render_widget(status_bar, status_area);
        })?;

        // Handle input
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('1') => state.select(Scenario::Best),
                    KeyCode::Char('2') => state.select(Scenario::Typical),
                    KeyCode::Char('3') => state.select(Scenario::Worst),
                    KeyCode::Tab => state.cycle_scenario(1),
                    KeyCode::BackTab => state.cycle_scenario(-1),
                    KeyCode::Left => state.move_lane(-1),
                    KeyCode::Right => state.move_lane(1),
                    KeyCode::Up => state.move_step(-1),
                    KeyCode::Down => state.move_step(1),
                    KeyCode::Enter | KeyCode::Char(' ') => state.toggle_focused_lane(),
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    let target = map.to_point(mouse.column, mouse.row).and_then(|p| {
                        state
                            .controller
                            .state()
                            .diagram()
                            .and_then(|d| hit_test(&d.commands, p).cloned())
                    });
                    match (mouse.kind, target) {
                        (MouseEventKind::Moved, Some(target)) => state.focus_on(&target),
                        (
                            MouseEventKind::Down(MouseButton::Left),
                            Some(HitTarget::LaneHeader { lane }),
                        ) => {
                            state.controller.toggle_lane(&lane);
                        }
                        (MouseEventKind::ScrollDown, _) => state.move_step(1),
                        (MouseEventKind::ScrollUp, _) => state.move_step(-1),
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEADER_ONLY: &str = r#"{
        "lanes": { "Leader": [ { "name": "Input", "ms": 5.0 }, { "name": "USB", "ms": 1.5 } ] },
        "totals": { "Leader": 6.5 },
        "overall": 6.5
    }"#;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("latency_Typical.json"), LEADER_ONLY).unwrap();
        dir
    }

    fn status(state: &mut TuiState<'_>) -> String {
        state.sync_tooltip();
        state.status_line().0
    }

    #[test]
    fn focused_step_details_in_status_line() {
        let dir = site();
        let source = DirSource::new(dir.path());
        let mut controller = ScenarioController::default();
        let mut state = TuiState::new(&mut controller, &source);
        state.select(Scenario::Typical);

        assert_eq!(status(&mut state), " Showing: Typical | Input: 5.0 ms");
        state.move_step(1);
        assert_eq!(status(&mut state), " Showing: Typical | USB: 1.5 ms");
        state.move_step(1);
        assert_eq!(status(&mut state), " Showing: Typical | USB: 1.5 ms");
    }

    #[test]
    fn collapsing_focused_lane_swaps_details_for_lane_name() {
        let dir = site();
        let source = DirSource::new(dir.path());
        let mut controller = ScenarioController::default();
        let mut state = TuiState::new(&mut controller, &source);
        state.select(Scenario::Typical);
        assert_eq!(status(&mut state), " Showing: Typical | Input: 5.0 ms");

        state.toggle_focused_lane();
        assert_eq!(status(&mut state), " Showing: Typical | Leader (collapsed)");
        assert_eq!(
            state.focus_target(),
            Some(HitTarget::LaneHeader {
                lane: "Leader".into()
            })
        );

        state.toggle_focused_lane();
        assert_eq!(status(&mut state), " Showing: Typical | Input: 5.0 ms");
    }

    #[test]
    fn missing_scenario_shows_error_in_status_line() {
        let dir = site();
        let source = DirSource::new(dir.path());
        let mut controller = ScenarioController::default();
        let mut state = TuiState::new(&mut controller, &source);
        state.select(Scenario::Worst);

        let (line, color) = state.status_line();
        assert!(line.starts_with(" Failed to load data:"), "{line}");
        assert_eq!(color, Color::LightRed);
        assert!(state.focus_target().is_none());
    }

    #[test]
    fn cell_map_round_trips_cell_centers() {
        let map = CellMap::new(Rect::new(0, 1, 148, 40), 1480.0, 2);
        let p = map.to_point(10, 5).unwrap();
        let (col, row) = map.cell(p);
        assert_eq!(map.screen(col, row), Some((10, 5)));
    }

    #[test]
    fn cell_map_rejects_out_of_area() {
        let map = CellMap::new(Rect::new(0, 1, 80, 20), 800.0, 0);
        assert!(map.to_point(0, 0).is_none());
        assert!(map.to_point(80, 5).is_none());
        assert!(map.screen(-1, 0).is_none());
        assert!(map.screen(0, 20).is_none());
    }

    #[test]
    fn scrolled_rows_are_hidden() {
        let map = CellMap::new(Rect::new(0, 1, 80, 20), 800.0, 3);
        assert!(map.screen(0, 2).is_none());
        assert_eq!(map.screen(0, 3), Some((0, 1)));
    }

    #[test]
    fn custom_paint_maps_to_rgb() {
        let color = swimlane_protocol::Color::rgb8(0x4e, 0x79, 0xa7);
        assert_eq!(
            paint_to_color(Paint::Custom(color)),
            Color::Rgb(0x4e, 0x79, 0xa7)
        );
        assert_eq!(
            paint_to_color(Paint::Theme(ThemeToken::ErrorText)),
            Color::LightRed
        );
    }

    #[test]
    fn focused_rect_uses_highlight() {
        let input = HitTarget::Step {
            lane: "Leader".into(),
            index: 0,
        };
        let rect = |target: Option<HitTarget>, x: f64| RenderCommand::DrawRect {
            rect: swimlane_protocol::Rect::new(x, 0.0, 5.0, 20.0),
            paint: Paint::Theme(ThemeToken::StepFill),
            border_color: None,
            corner_radius: 0.0,
            label: None,
            target,
        };
        let commands = vec![
            rect(Some(input.clone()), 0.0),
            rect(
                Some(HitTarget::Step {
                    lane: "Leader".into(),
                    index: 1,
                }),
                10.0,
            ),
        ];
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        let map = CellMap::new(area, 20.0, 0);
        draw_commands(&mut buf, &map, &commands, Some(&input));

        assert_eq!(buf[(0, 0)].bg, theme_to_color(ThemeToken::HoverHighlight));
        assert_eq!(buf[(10, 0)].bg, theme_to_color(ThemeToken::StepFill));
    }

    #[test]
    fn hidden_groups_are_not_drawn() {
        let commands = vec![
            RenderCommand::BeginGroup {
                id: "steps:Video".into(),
                label: None,
                hidden: true,
            },
            RenderCommand::DrawText {
                position: Point::new(0.0, 10.0),
                text: "hidden".into(),
                color: ThemeToken::StepText,
                font_size: 12.0,
                strong: false,
                align: TextAlign::Left,
            },
            RenderCommand::EndGroup,
            RenderCommand::DrawText {
                position: Point::new(0.0, 10.0),
                text: "shown".into(),
                color: ThemeToken::TitleText,
                font_size: 12.0,
                strong: false,
                align: TextAlign::Left,
            },
        ];
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        let map = CellMap::new(area, 20.0, 0);
        draw_commands(&mut buf, &map, &commands, None);

        let row: String = (0..5).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(row, "shown");
    }
}
