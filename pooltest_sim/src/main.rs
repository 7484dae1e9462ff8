//! Pooltest sweep CLI
//!
//! Compare exhaustive, Dorfman and combinatorial pooled testing by simulation.

use clap::Parser;
use pooltest_core::DorfmanDesign;
use pooltest_sim::{DesignSource, StrategyId, SweepConfig, SweepExport, SweepRunner};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Pooled testing Monte-Carlo CLI
#[derive(Parser, Debug)]
#[command(name = "pooltest-sim")]
#[command(about = "Estimate cost and accuracy of pooled testing designs", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Trials per (design, probability) point
    #[arg(short, long, default_value = "1000")]
    trials: usize,

    /// Study to run (basic, dorfman, pbest, overlap, all)
    #[arg(short = 'S', long, default_value = "all")]
    strategy: String,

    /// Prevalence to evaluate; repeat to build a grid (default: per-study grids)
    #[arg(short, long = "p")]
    probabilities: Vec<f64>,

    /// Dorfman design as `samples,vials`; repeat to compare several
    #[arg(short, long)]
    design: Vec<DorfmanDesign>,

    /// Batch size for exhaustive testing
    #[arg(long, default_value = "384")]
    individuals: usize,

    /// Pool-assignment table (default: built-in 384 x 48 GF(8) polynomial plate)
    #[arg(long)]
    pools: Option<PathBuf>,

    /// Number of pools on the plate; ids in the table must stay below it
    #[arg(long, requires = "pools")]
    pool_count: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,

    /// Export full results to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn build_config(args: &Args, seed: u64) -> SweepConfig {
    let mut config = SweepConfig {
        seed,
        trials: args.trials,
        basic_individuals: args.individuals,
        ..Default::default()
    };
    if !args.probabilities.is_empty() {
        config = config.with_probabilities(args.probabilities.clone());
    }
    if !args.design.is_empty() {
        config.dorfman_designs = args.design.clone();
    }
    if let Some(path) = &args.pools {
        config.pool_design = DesignSource::File {
            path: path.clone(),
            pool_count: args.pool_count,
        };
    }
    config
}

fn run(args: &Args, strategies: &[StrategyId], seed: u64) -> Result<SweepExport, pooltest_sim::SimError> {
    let runner = SweepRunner::new(build_config(args, seed))?;
    let export = runner.run_all(strategies)?;

    if let Some(path) = &args.export {
        export.write_to_file(path)?;
        info!("Exported {} studies to {}", export.studies.len(), path);
    }
    Ok(export)
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("Pooltest simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse strategies
    let strategies = StrategyId::parse_selection(&args.strategy).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available strategies: basic, dorfman, pbest, overlap, all");
        std::process::exit(1);
    });

    // Determine base seed
    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let export = match run(&args, &strategies, seed) {
        Ok(export) => export,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match export.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize results: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        export.print();
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!("✅ {} studies complete (seed={})", export.studies.len(), seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_count_requires_pools() {
        assert!(Args::try_parse_from(["pooltest-sim", "--pool-count", "48"]).is_err());

        let args = Args::try_parse_from(["pooltest-sim", "--pools", "plate.tsv", "--pool-count", "48"]).unwrap();
        match build_config(&args, 7).pool_design {
            DesignSource::File { path, pool_count } => {
                assert_eq!(path, PathBuf::from("plate.tsv"));
                assert_eq!(pool_count, Some(48));
            }
            other => panic!("unexpected design source: {:?}", other),
        }
    }

    #[test]
    fn test_default_args_use_builtin_plate() {
        let args = Args::try_parse_from(["pooltest-sim"]).unwrap();
        let config = build_config(&args, 7);
        assert_eq!(config.seed, 7);
        assert_eq!(config.pool_design, DesignSource::default());
        assert_eq!(StrategyId::parse_selection(&args.strategy), Ok(StrategyId::all()));
    }
}
