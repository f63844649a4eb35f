//! Native viewer. Usage: `swimlane-ui [site-root]` (defaults to `site`).

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::path::PathBuf;

    use swimlane_ui::SwimlaneApp;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SWIMLANE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_root = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("site"), PathBuf::from);

    eframe::run_native(
        "swimlane",
        eframe::NativeOptions::default(),
        Box::new(move |cc| Ok(Box::new(SwimlaneApp::new(cc, data_root)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start viewer: {e}"))
}

#[cfg(target_arch = "wasm32")]
fn main() {}
