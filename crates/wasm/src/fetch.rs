use swimlane_core::ScenarioDataset;
use swimlane_core::loader::{LoadError, parse_dataset};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Fetch and parse a dataset document relative to the page.
pub async fn fetch_dataset(path: &str) -> Result<ScenarioDataset, LoadError> {
    let transport = |e: JsValue| LoadError::Transport {
        path: path.to_string(),
        reason: e.as_string().unwrap_or_else(|| format!("{e:?}")),
    };

    let window = web_sys::window().ok_or_else(|| transport(JsValue::from_str("no window")))?;
    let resp_value = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(transport)?;
    let resp: web_sys::Response = resp_value.dyn_into().map_err(transport)?;
    if !resp.ok() {
        return Err(LoadError::Status {
            path: path.to_string(),
            status: resp.status(),
        });
    }
    let text = JsFuture::from(resp.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    let body = text
        .as_string()
        .ok_or_else(|| transport(JsValue::from_str("response body is not text")))?;
    parse_dataset(body.as_bytes())
}
