use eframe::egui;
use swimlane_core::hit::{hit_test, target_rect};
use swimlane_core::tooltip::Tooltip;
use swimlane_core::{DiagramState, Scenario, ScenarioController};
use swimlane_protocol::{HitTarget, Point, ThemeToken};

use crate::renderer;
use crate::theme::{self, ThemeMode};

#[cfg(target_arch = "wasm32")]
type PendingResults = std::sync::Arc<
    std::sync::Mutex<
        Vec<(
            swimlane_core::RequestToken,
            Result<swimlane_core::ScenarioDataset, swimlane_core::LoadError>,
        )>,
    >,
>;

/// Main application state.
pub struct SwimlaneApp {
    controller: ScenarioController,
    /// Site root holding `data/latency_<Scenario>.json`.
    #[cfg(not(target_arch = "wasm32"))]
    source: swimlane_core::DirSource,
    /// Responses from in-flight fetches, applied on the next frame.
    #[cfg(target_arch = "wasm32")]
    pending: PendingResults,
    #[cfg(target_arch = "wasm32")]
    egui_ctx: egui::Context,
    /// The one tooltip, reused for every hovered step.
    tooltip: Tooltip,
    theme_mode: ThemeMode,
    loading: bool,
}

/// What the pointer did on the diagram this frame.
#[derive(Default)]
struct DiagramInput {
    hovered_step: Option<(String, usize, egui::Pos2)>,
    clicked_lane: Option<String>,
}

impl SwimlaneApp {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(cc: &eframe::CreationContext<'_>, data_root: std::path::PathBuf) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        let mut app = Self {
            controller: ScenarioController::default(),
            source: swimlane_core::DirSource::new(data_root),
            tooltip: Tooltip::new(),
            theme_mode: ThemeMode::Light,
            loading: false,
        };
        app.select(Scenario::default());
        app
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        let mut app = Self {
            controller: ScenarioController::default(),
            pending: PendingResults::default(),
            egui_ctx: cc.egui_ctx.clone(),
            tooltip: Tooltip::new(),
            theme_mode: ThemeMode::Light,
            loading: false,
        };
        app.select(Scenario::default());
        app
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn select(&mut self, scenario: Scenario) {
        self.tooltip.hide();
        self.controller.select(&self.source, scenario);
    }

    #[cfg(target_arch = "wasm32")]
    fn select(&mut self, scenario: Scenario) {
        self.tooltip.hide();
        let token = self.controller.begin_request(scenario);
        self.loading = true;
        let pending = self.pending.clone();
        let ctx = self.egui_ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match Self::fetch_bytes(&scenario.data_path()).await {
                Ok(bytes) => swimlane_core::loader::parse_dataset(&bytes),
                Err(e) => Err(e),
            };
            if let Ok(mut lock) = pending.lock() {
                lock.push((token, result));
            }
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn apply_pending(&mut self) {
        let results: Vec<_> = {
            let mut lock = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            lock.drain(..).collect()
        };
        for (token, result) in results {
            if self.controller.finish_request(token, result) {
                self.loading = false;
                if let Some(msg) = self.controller.state().error_message() {
                    web_sys::console::error_1(&msg.into());
                }
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn fetch_bytes(url: &str) -> Result<Vec<u8>, swimlane_core::LoadError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let transport = |reason: String| swimlane_core::LoadError::Transport {
            path: url.to_string(),
            reason,
        };

        let window = web_sys::window().ok_or_else(|| transport("no window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| transport(format!("{e:?}")))?;
        let resp: web_sys::Response = resp_value
            .dyn_into()
            .map_err(|_| transport("not a Response".into()))?;
        if !resp.ok() {
            return Err(swimlane_core::LoadError::Status {
                path: url.to_string(),
                status: resp.status(),
            });
        }
        let buf = JsFuture::from(
            resp.array_buffer()
                .map_err(|e| transport(format!("{e:?}")))?,
        )
        .await
        .map_err(|e| transport(format!("{e:?}")))?;
        let uint8 = js_sys::Uint8Array::new(&buf);
        Ok(uint8.to_vec())
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Latency swimlane");
                ui.separator();

                let mut chosen = self.controller.selected();
                egui::ComboBox::from_label("Scenario")
                    .selected_text(chosen.name())
                    .show_ui(ui, |ui| {
                        for scenario in self.controller.scenarios() {
                            ui.selectable_value(&mut chosen, *scenario, scenario.name());
                        }
                    });
                if chosen != self.controller.selected() {
                    self.select(chosen);
                }

                #[cfg(not(target_arch = "wasm32"))]
                {
                    ui.separator();
                    if ui.button("📂 Data folder").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .set_directory(self.source.root())
                            .pick_folder()
                        {
                            tracing::info!(root = %path.display(), "switching data folder");
                            self.source = swimlane_core::DirSource::new(path);
                            self.select(self.controller.selected());
                        }
                    }
                }

                ui.separator();

                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "🌙 Dark",
                    ThemeMode::Light => "☀ Light",
                };
                if ui.button(theme_label).clicked() {
                    self.theme_mode = match self.theme_mode {
                        ThemeMode::Dark => {
                            ctx.set_visuals(egui::Visuals::light());
                            ThemeMode::Light
                        }
                        ThemeMode::Light => {
                            ctx.set_visuals(egui::Visuals::dark());
                            ThemeMode::Dark
                        }
                    };
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(label) = self.controller.status_label() {
                        ui.strong(label);
                        ui.label("Showing:");
                    }
                });
            });
        });
    }

    fn status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| match self.controller.state() {
                DiagramState::Failed { message, .. } => {
                    ui.colored_label(theme::resolve(ThemeToken::ErrorText, self.theme_mode), message);
                }
                DiagramState::Ready {
                    scenario, dataset, ..
                } => {
                    ui.label(format!(
                        "{scenario} | {} lanes | {} steps | click a lane header to collapse it",
                        dataset.lanes.len(),
                        dataset.lanes.values().map(Vec::len).sum::<usize>(),
                    ));
                }
                DiagramState::Empty => {
                    ui.label(if self.loading { "Loading…" } else { "No data loaded" });
                }
            });
        });
    }

    fn diagram(&self, ctx: &egui::Context) -> DiagramInput {
        let mut input = DiagramInput::default();
        let mode = self.theme_mode;

        egui::CentralPanel::default().show(ctx, |ui| {
            let diagram = match self.controller.state() {
                DiagramState::Ready { diagram, .. } => diagram,
                DiagramState::Failed { message, .. } => {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(theme::resolve(ThemeToken::ErrorText, mode), message);
                    });
                    return;
                }
                DiagramState::Empty => {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                    return;
                }
            };

            egui::ScrollArea::both().show(ui, |ui| {
                let size = egui::vec2(diagram.width as f32, diagram.height as f32);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
                let origin = response.rect.min;
                painter.rect_filled(
                    response.rect,
                    egui::CornerRadius::ZERO,
                    theme::resolve(ThemeToken::Background, mode),
                );
                renderer::render_commands(&painter, &diagram.commands, origin, mode);

                let to_diagram = |pos: egui::Pos2| {
                    Point::new(f64::from(pos.x - origin.x), f64::from(pos.y - origin.y))
                };

                if let Some(pos) = response.hover_pos() {
                    match hit_test(&diagram.commands, to_diagram(pos)) {
                        Some(target @ HitTarget::Step { lane, index }) => {
                            if let Some(rect) = target_rect(&diagram.commands, target) {
                                let rect = egui::Rect::from_min_size(
                                    origin + egui::vec2(rect.x as f32, rect.y as f32),
                                    egui::vec2(rect.w as f32, rect.h as f32),
                                );
                                painter.rect_filled(
                                    rect,
                                    egui::CornerRadius::same(8),
                                    theme::resolve(ThemeToken::HoverHighlight, mode),
                                );
                            }
                            input.hovered_step = Some((lane.clone(), *index, pos));
                        }
                        Some(HitTarget::LaneHeader { .. }) => {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        None => {}
                    }
                }

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        if let Some(HitTarget::LaneHeader { lane }) =
                            hit_test(&diagram.commands, to_diagram(pos))
                        {
                            input.clicked_lane = Some(lane.clone());
                        }
                    }
                }
            });
        });

        input
    }

    fn update_tooltip(&mut self, ctx: &egui::Context, hovered: Option<(String, usize, egui::Pos2)>) {
        let step = hovered.and_then(|(lane, index, pos)| match self.controller.state() {
            DiagramState::Ready { dataset, .. } => dataset
                .step(&lane, index)
                .map(|step| (step.clone(), pos)),
            _ => None,
        });
        match step {
            Some((step, pos)) => self
                .tooltip
                .show(&step, Point::new(f64::from(pos.x), f64::from(pos.y))),
            None => self.tooltip.hide(),
        }

        let dt = ctx.input(|i| i.stable_dt);
        if self.tooltip.tick(dt) {
            ctx.request_repaint();
        }
        if !self.tooltip.is_visible() {
            return;
        }
        let Some(content) = self.tooltip.content() else {
            return;
        };

        let opacity = self.tooltip.opacity();
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Tooltip,
            egui::Id::new("step_tooltip"),
        ));
        let text_color = theme::resolve(ThemeToken::TooltipText, self.theme_mode);
        let galley = painter.layout_no_wrap(
            format!("{}\n{}", content.title, content.detail),
            egui::FontId::proportional(12.0),
            text_color.gamma_multiply(opacity),
        );
        let pos = self.tooltip.position();
        let min = egui::pos2(pos.x as f32, pos.y as f32);
        let bg = egui::Rect::from_min_size(min, galley.size() + egui::vec2(16.0, 12.0));
        painter.rect_filled(
            bg,
            egui::CornerRadius::same(6),
            theme::resolve(ThemeToken::TooltipBackground, self.theme_mode).gamma_multiply(opacity),
        );
        painter.galley(min + egui::vec2(8.0, 6.0), galley, text_color);
    }
}

impl eframe::App for SwimlaneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(target_arch = "wasm32")]
        self.apply_pending();

        self.toolbar(ctx);
        self.status_bar(ctx);
        let input = self.diagram(ctx);

        if let Some(lane) = input.clicked_lane {
            if self.controller.toggle_lane(&lane).is_some() {
                self.tooltip.hide();
            }
        }
        self.update_tooltip(ctx, input.hovered_step);
    }
}
