use std::cell::RefCell;
use std::rc::Rc;

use swimlane_core::svg::{escape_xml, render_svg};
use swimlane_core::tooltip::Tooltip;
use swimlane_core::views::swimlane::steps_group_id;
use swimlane_core::{DiagramState, Scenario, ScenarioController};
use swimlane_protocol::Point;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlSelectElement, MouseEvent};

use crate::fetch::fetch_dataset;

const DIAGRAM_ID: &str = "diagram";
const SELECT_ID: &str = "scenario";
const STATUS_ID: &str = "currentScenario";

/// Everything the page owns. The tooltip element is created once at mount
/// and reused for every hover.
struct Page {
    container: Element,
    status: Element,
    tooltip_el: HtmlElement,
    tooltip: Tooltip,
    controller: ScenarioController,
}

type SharedPage = Rc<RefCell<Page>>;

pub fn mount(document: &Document) -> Result<(), JsValue> {
    let container = element(document, DIAGRAM_ID)?;
    let status = element(document, STATUS_ID)?;
    let select: HtmlSelectElement = element(document, SELECT_ID)?.dyn_into()?;
    let body = document.body().ok_or("no body")?;

    let tooltip_el: HtmlElement = document.create_element("div")?.dyn_into()?;
    tooltip_el.set_class_name("tooltip");
    let style = tooltip_el.style();
    style.set_property("position", "absolute")?;
    style.set_property("pointer-events", "none")?;
    style.set_property("opacity", "0")?;
    style.set_property("transition", "opacity 150ms")?;
    body.append_child(&tooltip_el)?;

    let controller = ScenarioController::default();
    for scenario in controller.scenarios() {
        let option = document.create_element("option")?;
        option.set_attribute("value", scenario.name())?;
        option.set_text_content(Some(scenario.name()));
        select.append_child(&option)?;
    }
    select.set_value(Scenario::default().name());

    let page: SharedPage = Rc::new(RefCell::new(Page {
        container,
        status,
        tooltip_el,
        tooltip: Tooltip::new(),
        controller,
    }));

    bind_select(&page, &select)?;
    bind_diagram(&page)?;
    apply_scenario(&page, Scenario::default());
    Ok(())
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id '{id}'")))
}

fn bind_select(page: &SharedPage, select: &HtmlSelectElement) -> Result<(), JsValue> {
    let page = Rc::clone(page);
    let sel = select.clone();
    let on_change = Closure::<dyn FnMut()>::new(move || match sel.value().parse::<Scenario>() {
        Ok(scenario) => apply_scenario(&page, scenario),
        Err(e) => web_sys::console::error_1(&e.to_string().into()),
    });
    select.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    on_change.forget();
    Ok(())
}

/// Hover and click are delegated to the container, so re-rendering its
/// content never needs to rebind anything.
fn bind_diagram(page: &SharedPage) -> Result<(), JsValue> {
    let container = page.borrow().container.clone();

    let hover_page = Rc::clone(page);
    let on_over = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let Some((lane, index)) = step_under(&event) else {
            return;
        };
        let cursor = Point::new(f64::from(event.page_x()), f64::from(event.page_y()));
        hover_page.borrow_mut().show_tooltip(&lane, index, cursor);
    });
    container.add_event_listener_with_callback("mouseover", on_over.as_ref().unchecked_ref())?;
    on_over.forget();

    let leave_page = Rc::clone(page);
    let on_out = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        if step_under(&event).is_some() {
            leave_page.borrow_mut().hide_tooltip();
        }
    });
    container.add_event_listener_with_callback("mouseout", on_out.as_ref().unchecked_ref())?;
    on_out.forget();

    let click_page = Rc::clone(page);
    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let header = target_element(&event)
            .and_then(|el| el.closest(".lane-header").ok().flatten())
            .and_then(|el| el.get_attribute("data-lane"));
        if let Some(lane) = header
            && let Err(e) = click_page.borrow_mut().toggle_lane(&lane)
        {
            web_sys::console::error_1(&e);
        }
    });
    container.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    Ok(())
}

fn target_element(event: &MouseEvent) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn step_under(event: &MouseEvent) -> Option<(String, usize)> {
    let el = target_element(event)?;
    if !el.class_list().contains("step") {
        return None;
    }
    let lane = el.get_attribute("data-lane")?;
    let index = el.get_attribute("data-step")?.parse().ok()?;
    Some((lane, index))
}

/// Load then render. A response is applied only if no newer selection was
/// made while it was in flight.
fn apply_scenario(page: &SharedPage, scenario: Scenario) {
    let token = page.borrow_mut().controller.begin_request(scenario);
    let page = Rc::clone(page);
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_dataset(&scenario.data_path()).await;
        let mut page = page.borrow_mut();
        if page.controller.finish_request(token, result) {
            page.paint();
        }
    });
}

impl Page {
    /// Replace the container's content with the current state.
    fn paint(&mut self) {
        self.hide_tooltip();
        match self.controller.state() {
            DiagramState::Ready { diagram, .. } => {
                self.container.set_inner_html(&render_svg(
                    &diagram.commands,
                    diagram.width,
                    diagram.height,
                ));
                self.status.set_text_content(self.controller.status_label());
            }
            DiagramState::Failed { message, .. } => {
                web_sys::console::error_1(&JsValue::from_str(message));
                self.container.set_inner_html(&format!(
                    r#"<div class="error">{}</div>"#,
                    escape_xml(message)
                ));
            }
            DiagramState::Empty => self.container.set_inner_html(""),
        }
    }

    fn show_tooltip(&mut self, lane: &str, index: usize, cursor: Point) {
        let DiagramState::Ready { dataset, .. } = self.controller.state() else {
            return;
        };
        let Some(step) = dataset.step(lane, index) else {
            return;
        };
        self.tooltip.show(step, cursor);
        if let Some(content) = self.tooltip.content() {
            self.tooltip_el.set_inner_html(&format!(
                "<strong>{}</strong><br>{}",
                escape_xml(&content.title),
                escape_xml(&content.detail)
            ));
        }
        self.sync_tooltip_style();
    }

    fn hide_tooltip(&mut self) {
        self.tooltip.hide();
        self.sync_tooltip_style();
    }

    fn sync_tooltip_style(&self) {
        let style = self.tooltip_el.style();
        let pos = self.tooltip.position();
        let result = style
            .set_property("left", &format!("{}px", pos.x))
            .and_then(|()| style.set_property("top", &format!("{}px", pos.y)))
            .and_then(|()| {
                style.set_property("opacity", &self.tooltip.target_opacity().to_string())
            });
        if let Err(e) = result {
            web_sys::console::error_1(&e);
        }
    }

    /// Show or hide a lane's step stack in place; nothing else moves.
    fn toggle_lane(&mut self, lane: &str) -> Result<(), JsValue> {
        let Some(collapsed) = self.controller.toggle_lane(lane) else {
            return Ok(());
        };
        let wanted = steps_group_id(lane);
        let groups = self.container.query_selector_all("g[data-group]")?;
        for i in 0..groups.length() {
            let Some(el) = groups.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if el.get_attribute("data-group").as_deref() != Some(wanted.as_str()) {
                continue;
            }
            if collapsed {
                el.set_attribute("display", "none")?;
            } else {
                el.remove_attribute("display")?;
            }
        }
        Ok(())
    }
}
