//! Explore command handler.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use cavern_lib::{explore, load_cavern, ExplorationSession};

use cavern_cli::output::{render_exploration_text, render_json, OutputFormat};
use cavern_cli::terminal::ColorPalette;

pub fn handle_explore(cavern_path: &Path, format: OutputFormat) -> Result<()> {
    let cavern = load_cavern(cavern_path)
        .with_context(|| format!("failed to load cavern from {}", cavern_path.display()))?;
    let mut session = ExplorationSession::for_cavern(&cavern)?;
    let report = explore(&mut session).context("exploration did not reach the orb")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => render_exploration_text(&mut out, &report, ColorPalette::detect())?,
        OutputFormat::Json => render_json(&mut out, &report)?,
    }
    out.flush()?;
    Ok(())
}
