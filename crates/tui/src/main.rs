mod renderer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use swimlane_core::{DiagramState, DirSource, LayoutConfig, Scenario, ScenarioController};

const USAGE: &str =
    "Usage: swimlane <site-dir> [--scenario Best|Typical|Worst] [--svg out.svg] [--layout layout.json]";

#[derive(Debug, PartialEq)]
struct Args {
    data_dir: PathBuf,
    scenario: Scenario,
    svg: Option<PathBuf>,
    layout: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut data_dir = None;
    let mut scenario = Scenario::default();
    let mut svg = None;
    let mut layout = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scenario" => {
                let value = args.next().context("--scenario needs a value")?;
                scenario = value.parse()?;
            }
            "--svg" => svg = Some(PathBuf::from(args.next().context("--svg needs a path")?)),
            "--layout" => {
                layout = Some(PathBuf::from(args.next().context("--layout needs a path")?));
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            _ if data_dir.is_none() => data_dir = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {arg}\n{USAGE}"),
        }
    }

    Ok(Args {
        data_dir: data_dir.context(USAGE)?,
        scenario,
        svg,
        layout,
    })
}

fn load_layout(path: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
}

fn init_logging(default_filter: Option<&str>) {
    let filter = match std::env::var("SWIMLANE_LOG") {
        Ok(filter) => filter,
        Err(_) => match default_filter {
            Some(filter) => filter.to_string(),
            None => return,
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

fn export_svg(
    controller: &mut ScenarioController,
    source: &DirSource,
    scenario: Scenario,
    out: &Path,
) -> Result<()> {
    match controller.select(source, scenario) {
        DiagramState::Ready { diagram, .. } => {
            let svg =
                swimlane_core::svg::render_svg(&diagram.commands, diagram.width, diagram.height);
            std::fs::write(out, svg).with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(%scenario, out = %out.display(), "exported diagram");
            Ok(())
        }
        DiagramState::Failed { message, .. } => bail!("{message}"),
        DiagramState::Empty => bail!("no data loaded for {scenario}"),
    }
}

fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    init_logging(args.svg.as_ref().map(|_| "info"));

    let config = load_layout(args.layout.as_deref())?;
    let mut controller = ScenarioController::new(config);
    let source = DirSource::new(&args.data_dir);

    if let Some(out) = &args.svg {
        return export_svg(&mut controller, &source, args.scenario, out);
    }

    controller.select(&source, args.scenario);
    renderer::render_tui(&mut controller, &source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn data_dir_only_defaults_to_typical() {
        let parsed = args(&["site"]).unwrap();
        assert_eq!(parsed.data_dir, PathBuf::from("site"));
        assert_eq!(parsed.scenario, Scenario::Typical);
        assert!(parsed.svg.is_none());
        assert!(parsed.layout.is_none());
    }

    #[test]
    fn all_options() {
        let parsed = args(&[
            "--scenario",
            "worst",
            "site",
            "--svg",
            "out.svg",
            "--layout",
            "layout.json",
        ])
        .unwrap();
        assert_eq!(parsed.scenario, Scenario::Worst);
        assert_eq!(parsed.data_dir, PathBuf::from("site"));
        assert_eq!(parsed.svg, Some(PathBuf::from("out.svg")));
        assert_eq!(parsed.layout, Some(PathBuf::from("layout.json")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(args(&[]).is_err());
        assert!(args(&["site", "--scenario", "Median"]).is_err());
        assert!(args(&["site", "--svg"]).is_err());
        assert!(args(&["site", "--zoom", "2"]).is_err());
        assert!(args(&["site", "other"]).is_err());
    }

    #[test]
    fn partial_layout_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{ "lane_width": 200.0 }"#).unwrap();

        let config = load_layout(Some(path.as_path())).unwrap();
        assert_eq!(config.lane_width, 200.0);
        assert_eq!(config.step_height, LayoutConfig::default().step_height);
    }
}
