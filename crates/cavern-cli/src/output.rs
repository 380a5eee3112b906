//! Output formatting for routes and run reports.
//!
//! Renderers write to any [`Write`] sink so they can be exercised in tests;
//! the command handlers pass standard output.

use std::io::{self, Write};

use cavern_lib::{EscapeReport, ExplorationReport, NodeId, Route, RouteAlgorithm};
use clap::ValueEnum;
use serde::Serialize;

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Route as reported by the `route` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub start: NodeId,
    pub goal: NodeId,
    pub hops: usize,
    pub cost: u64,
    pub steps: Vec<NodeId>,
}

impl RouteSummary {
    pub fn new(algorithm: RouteAlgorithm, start: NodeId, goal: NodeId, route: Route) -> Self {
        Self {
            algorithm,
            start,
            goal,
            hops: route.hop_count(),
            cost: route.cost,
            steps: route.steps,
        }
    }
}

/// Serialize any report as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json<T: Serialize>(out: &mut impl Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

/// Render a route using `+`/`|`/`-` prefixes for first/middle/last steps.
pub fn render_route_text(
    out: &mut impl Write,
    summary: &RouteSummary,
    palette: ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "Route from {} to {} ({} hops; algorithm: {}):",
        summary.start, summary.goal, summary.hops, summary.algorithm
    )?;
    write_walk(out, &summary.steps, palette)?;
    writeln!(out, "\nTotal cost: {}", summary.cost)
}

/// Render an exploration report.
pub fn render_exploration_text(
    out: &mut impl Write,
    report: &ExplorationReport,
    palette: ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "Reached orb at node {}{}{} in {} steps ({} forward, {} backtracks)",
        palette.white_bold,
        report.target,
        palette.reset,
        report.steps,
        report.forward_moves,
        report.backtracks
    )?;
    write_walk(out, &report.walk, palette)
}

/// Render an escape report.
pub fn render_escape_text(
    out: &mut impl Write,
    report: &EscapeReport,
    palette: ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "Escaped at node {}{}{} with {}{} gold{} ({} detours)",
        palette.white_bold,
        report.exit,
        palette.reset,
        palette.yellow,
        report.gold_collected,
        palette.reset,
        report.detours
    )?;
    write_walk(out, &report.walk, palette)?;
    writeln!(
        out,
        "\nTime spent: {} (remaining {})",
        report.time_spent, report.time_remaining
    )
}

fn write_walk(out: &mut impl Write, walk: &[NodeId], palette: ColorPalette) -> io::Result<()> {
    let len = walk.len();
    for (i, node) in walk.iter().enumerate() {
        let (prefix, color) = if i == 0 {
            ('+', palette.green)
        } else if i + 1 == len {
            ('-', palette.magenta)
        } else {
            ('|', palette.gray)
        };
        writeln!(out, "{color}{prefix}{} {node}", palette.reset)?;
    }
    Ok(())
}
