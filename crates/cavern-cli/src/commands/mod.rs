//! Subcommand handlers; `main.rs` parses arguments and dispatches here.

pub mod escape;
pub mod explore;
pub mod route;

use anyhow::Result;
use cavern_lib::PlannerConfig;

/// Planner configuration from the environment, before flag overrides.
pub(crate) fn base_config() -> Result<PlannerConfig> {
    Ok(PlannerConfig::from_env()?)
}
