use std::error::Error;
use std::path::PathBuf;

use balance_majority::{graph_fingerprint, CanonStats, FindMajority, JoinStrategy, RunConfig};
use balance_search::{Problem, SearchEngine, SolveReport};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::tree::render_tree;
use crate::write_json;

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Number of coins (odd, at least three); overrides the config file.
    #[arg(long)]
    pub coins: Option<u8>,
    /// Allow any heavy count from one to all but one coin.
    #[arg(long)]
    pub general: bool,
    /// Part joining strategy: none, same-variety, all or validate.
    #[arg(long)]
    pub join: Option<String>,
    /// Give up once the root needs more weighings than this.
    #[arg(long)]
    pub stop_depth: Option<u8>,
    /// Keep raw states instead of canonical ones.
    #[arg(long)]
    pub raw: bool,
    /// YAML run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write the JSON summary to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Print the witnessing decision tree instead of the summary.
    #[arg(long)]
    pub tree: bool,
    /// With `--tree`, follow only the first outcome of every weighing.
    #[arg(long)]
    pub happy_path: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    config: &'a RunConfig,
    report: SolveReport,
    canonicalisation: CanonStats,
    fingerprint: String,
}

pub fn run(args: &SolveArgs) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(args)?;
    let problem = FindMajority::from_config(&config)?;
    info!(problem = %problem.describe(), stop_depth = config.effective_stop_depth(), "solving");

    let mut engine = SearchEngine::new(problem);
    let sizes = engine.solve_breadth(config.effective_stop_depth());
    let report = engine.report(sizes, args.tree);
    info!(
        depth_min = report.depth_min,
        depth_max = ?report.depth_max,
        states = report.states,
        "search finished"
    );

    let summary = RunSummary {
        config: &config,
        canonicalisation: engine.problem().canon_stats(),
        fingerprint: graph_fingerprint(&engine),
        report,
    };
    if let Some(out) = &args.out {
        write_json(out, &summary)?;
    }
    if args.tree {
        match &summary.report.tree {
            Some(tree) => {
                println!("{}", summary.report.problem);
                print!("{}", render_tree(tree, args.happy_path));
            }
            None => {
                return Err(format!(
                    "no strategy within {} weighings (lower bound {})",
                    config.effective_stop_depth(),
                    summary.report.depth_min
                )
                .into())
            }
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

/// Config file first, then command-line overrides.
fn resolve_config(args: &SolveArgs) -> Result<RunConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(coins) = args.coins {
        config.coin_count = coins;
    }
    if args.general {
        config.almost_balanced = false;
    }
    if let Some(join) = &args.join {
        config.join_strategy = join.parse::<JoinStrategy>()?;
    }
    if let Some(depth) = args.stop_depth {
        config.stop_depth = Some(depth);
    }
    if args.raw {
        config.canonicalize = false;
    }
    config.validate()?;
    Ok(config)
}
