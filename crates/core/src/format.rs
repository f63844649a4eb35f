//! Display strings. Every duration is shown with exactly one fractional digit.

/// `5` → `"5.0 ms"`.
pub fn format_ms(ms: f64) -> String {
    format!("{ms:.1} ms")
}

pub fn title_text(overall: f64) -> String {
    format!("Overall Command→Photon: {}", format_ms(overall))
}

pub fn lane_header_text(lane: &str, total: f64) -> String {
    format!("{lane} (total {})", format_ms(total))
}

pub fn load_error_text(reason: &impl std::fmt::Display) -> String {
    format!("Failed to load data: {reason}")
}
