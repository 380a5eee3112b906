//! Route command handler.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use cavern_lib::{load_cavern, select_planner, NodeId, RouteAlgorithm};

use cavern_cli::output::{render_json, render_route_text, OutputFormat, RouteSummary};
use cavern_cli::terminal::ColorPalette;

use super::base_config;

pub fn handle_route(
    cavern_path: &Path,
    from: NodeId,
    to: NodeId,
    algorithm: Option<RouteAlgorithm>,
    format: OutputFormat,
) -> Result<()> {
    let cavern = load_cavern(cavern_path)
        .with_context(|| format!("failed to load cavern from {}", cavern_path.display()))?;
    let algorithm = match algorithm {
        Some(algorithm) => algorithm,
        None => base_config()?.algorithm,
    };

    let planner = select_planner(algorithm);
    let route = planner
        .find_path(&cavern.graph, from, to)
        .with_context(|| format!("no route from node {from} to node {to}"))?;
    let summary = RouteSummary::new(algorithm, from, to, route);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => render_route_text(&mut out, &summary, ColorPalette::detect())?,
        OutputFormat::Json => render_json(&mut out, &summary)?,
    }
    out.flush()?;
    Ok(())
}
