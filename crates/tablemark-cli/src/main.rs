//! tablemark - CRUD and query latency benchmark against a table store.
//!
//! Runs five timed phases (insert, retrieve, query, replace, delete) for N
//! iterations each and prints a p0/p50/p90/p99 summary per phase.

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;

use tablemark_bench::{Runner, RunnerConfig, WallTimer};
use tablemark_store::{SledStore, DEFAULT_TABLE};

/// Named-settings key for the default connection target's data path.
const DATA_PATH_KEY: &str = "TABLEMARK_DATA_PATH";

/// Named-settings key for the Standard connection target's data path.
const STANDARD_DATA_PATH_KEY: &str = "TABLEMARK_STANDARD_DATA_PATH";

/// CRUD/query latency benchmark for a table store.
#[derive(Parser, Debug)]
#[command(name = "tablemark")]
#[command(version, about = "CRUD/query latency benchmark for a table store")]
struct Args {
    /// Connection-target selector; "Standard" picks the alternate target,
    /// any other value falls back to the default.
    target: Option<String>,

    /// Iterations per phase.
    #[arg(default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    iterations: u64,

    /// Table name.
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// RNG seed for reproducible entity generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Exit immediately instead of waiting for Enter.
    #[arg(long)]
    no_wait: bool,
}

/// Connection-target presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Default,
    Standard,
}

impl Target {
    /// Select a preset from the first positional argument. Unknown values
    /// fall back to the default target rather than failing.
    fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("Standard") => Target::Standard,
            _ => Target::Default,
        }
    }

    fn data_path_key(self) -> &'static str {
        match self {
            Target::Default => DATA_PATH_KEY,
            Target::Standard => STANDARD_DATA_PATH_KEY,
        }
    }
}

fn main() {
    // Initialize tracing; benchmark output itself goes to plain stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tablemark=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let target = Target::from_arg(args.target.as_deref());

    // Resolve the connection target from the environment; fall back to a
    // run-scoped temporary directory so the tool works out of the box.
    let (store, _tmpdir) = match std::env::var_os(target.data_path_key()) {
        Some(path) => {
            let path = PathBuf::from(path);
            tracing::info!(?target, path = %path.display(), "opening configured data path");
            (SledStore::open(&path)?, None)
        }
        None => {
            let dir = tempfile::tempdir()?;
            tracing::info!(
                ?target,
                path = %dir.path().display(),
                "no data path configured, using a temporary directory"
            );
            (SledStore::open(dir.path())?, Some(dir))
        }
    };

    let config = RunnerConfig {
        table: args.table.clone(),
        iterations: args.iterations as usize,
        seed: args.seed,
        progress: true,
    };
    let mut runner = Runner::new(&store, WallTimer, config);
    runner.run()?;
    store.flush()?;

    if !args.no_wait {
        println!("Press Enter to exit...");
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_selection() {
        assert_eq!(Target::from_arg(None), Target::Default);
        assert_eq!(Target::from_arg(Some("Standard")), Target::Standard);
        // Unknown selectors fall back instead of failing.
        assert_eq!(Target::from_arg(Some("premium")), Target::Default);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["tablemark"]).unwrap();
        assert_eq!(args.target, None);
        assert_eq!(args.iterations, 100);
        assert_eq!(args.table, DEFAULT_TABLE);
        assert!(!args.no_wait);
    }

    #[test]
    fn test_args_positionals() {
        let args = Args::try_parse_from(["tablemark", "Standard", "50"]).unwrap();
        assert_eq!(args.target.as_deref(), Some("Standard"));
        assert_eq!(args.iterations, 50);
    }

    #[test]
    fn test_non_numeric_iterations_fails_parse() {
        assert!(Args::try_parse_from(["tablemark", "Standard", "lots"]).is_err());
    }

    #[test]
    fn test_zero_iterations_fails_parse() {
        assert!(Args::try_parse_from(["tablemark", "Standard", "0"]).is_err());
    }
}
