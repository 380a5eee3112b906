//! Escape command handler.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use cavern_lib::{escape, load_cavern, EscapeSession, NodeId, PlannerConfig, RouteAlgorithm};

use cavern_cli::output::{render_escape_text, render_json, OutputFormat};
use cavern_cli::terminal::ColorPalette;

use super::base_config;

/// Arguments for the escape command.
#[derive(Debug, Clone)]
pub struct EscapeCommandArgs {
    pub cavern: PathBuf,
    pub time: u64,
    /// Starting node; the orb when absent.
    pub start: Option<NodeId>,
    pub richness: Option<f64>,
    pub algorithm: Option<RouteAlgorithm>,
}

impl EscapeCommandArgs {
    /// Environment configuration with command-line overrides applied.
    fn planner_config(&self) -> Result<PlannerConfig> {
        let mut config = base_config()?;
        if let Some(threshold) = self.richness {
            config = config.with_richness_threshold(threshold)?;
        }
        if let Some(algorithm) = self.algorithm {
            config = config.with_algorithm(algorithm);
        }
        Ok(config)
    }
}

pub fn handle_escape(args: &EscapeCommandArgs, format: OutputFormat) -> Result<()> {
    let config = args.planner_config()?;
    let cavern = load_cavern(&args.cavern)
        .with_context(|| format!("failed to load cavern from {}", args.cavern.display()))?;
    let start = args.start.unwrap_or(cavern.orb);
    debug!(start, time = args.time, ?config, "starting escape");

    let mut session = EscapeSession::for_cavern(&cavern, start, args.time)?;
    let report = escape(&cavern.graph, &mut session, &config)
        .with_context(|| format!("escape from node {start} failed"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => render_escape_text(&mut out, &report, ColorPalette::detect())?,
        OutputFormat::Json => render_json(&mut out, &report)?,
    }
    out.flush()?;
    Ok(())
}
