use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cavern_cli::output::OutputFormat;
use cavern_lib::{NodeId, RouteAlgorithm};

mod commands;

/// Environment variable selecting JSON log lines on stderr.
const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Parser, Debug)]
#[command(author, version, about = "Cavern route planning and run simulation")]
struct Cli {
    /// Output format for command results.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the shortest route between two nodes of a cavern.
    Route(RouteArgs),
    /// Walk from the entrance to the orb using distance readings only.
    Explore(CavernArg),
    /// Collect gold within a time budget and finish on the exit.
    Escape(EscapeArgs),
}

#[derive(Args, Debug)]
struct CavernArg {
    /// Path to a cavern scenario JSON document.
    #[arg(long)]
    cavern: PathBuf,
}

#[derive(Args, Debug)]
struct RouteArgs {
    #[command(flatten)]
    cavern: CavernArg,
    /// Starting node id.
    #[arg(long = "from")]
    from: NodeId,
    /// Destination node id.
    #[arg(long = "to")]
    to: NodeId,
    /// Search algorithm; defaults to the configured planner.
    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmArg>,
}

#[derive(Args, Debug)]
struct EscapeArgs {
    #[command(flatten)]
    cavern: CavernArg,
    /// Time budget for the escape.
    #[arg(long)]
    time: u64,
    /// Node to start from; defaults to the orb.
    #[arg(long)]
    start: Option<NodeId>,
    /// Fraction of the richest pile a node must hold to be a detour target.
    #[arg(long)]
    richness: Option<f64>,
    /// Search algorithm used for every route.
    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    #[value(name = "a-star", alias = "astar")]
    AStar,
    Dijkstra,
}

impl From<AlgorithmArg> for RouteAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::AStar => RouteAlgorithm::AStar,
            AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Route(args) => commands::route::handle_route(
            &args.cavern.cavern,
            args.from,
            args.to,
            args.algorithm.map(RouteAlgorithm::from),
            cli.format,
        ),
        Command::Explore(args) => commands::explore::handle_explore(&args.cavern, cli.format),
        Command::Escape(args) => commands::escape::handle_escape(
            &commands::escape::EscapeCommandArgs {
                cavern: args.cavern.cavern,
                time: args.time,
                start: args.start,
                richness: args.richness,
                algorithm: args.algorithm.map(RouteAlgorithm::from),
            },
            cli.format,
        ),
    }
}

/// Logs go to stderr so stdout stays parseable in JSON mode.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
