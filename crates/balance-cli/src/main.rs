use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use commands::{
    enumerate::{self, EnumerateArgs},
    solve::{self, SolveArgs},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod tree;

#[derive(Parser, Debug)]
#[command(name = "balance", about = "Optimal weighing strategies for the majority-coin puzzle")]
struct Cli {
    /// Log expansions as well as deepening steps.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for the fewest weighings that identify a majority coin.
    Solve(SolveArgs),
    /// List the weighings of a partition, one per mirror pair.
    Enumerate(EnumerateArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Solve(args) => solve::run(&args),
        Command::Enumerate(args) => enumerate::run(&args),
    }
}

/// Logs go to stderr so stdout stays machine readable; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn write_json<P: AsRef<Path>, T: serde::Serialize>(path: P, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
