use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use persistree::script::{parse_kth_batch, parse_script, ScriptRunner};
use persistree::{OrderStatisticTree, RangeStrategy, TreeConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "persistree", about = "Versioned segment trees with O(log N) updates")]
struct Cli {
    /// Log every published version.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct TreeOptions {
    /// Range-update strategy: `lazy` or `permanent`.
    #[arg(long, default_value_t = RangeStrategy::Lazy)]
    strategy: RangeStrategy,
    /// Arena node limit (unbounded when omitted).
    #[arg(long)]
    capacity: Option<usize>,
    /// Print an allocation report after running.
    #[arg(long)]
    profile: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a command script (build, assign, point-add, range-add, sum, get, kth, dump).
    Run {
        /// Script file, one command per line.
        script: PathBuf,
        #[command(flatten)]
        options: TreeOptions,
    },
    /// Answer k-th smallest queries over index ranges.
    Kth {
        /// Input file: values on the first line, then `l r k` per line.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { script, options } => run_script(script, options, cli.verbose)?,
        Commands::Kth { input } => run_kth(input)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_script(path: PathBuf, options: TreeOptions, verbose: bool) -> Result<()> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let lines = parse_script(&text)
        .with_context(|| format!("failed to parse script {}", path.display()))?;

    let mut config = TreeConfig::default()
        .with_strategy(options.strategy)
        .with_space_profiling(options.profile)
        .with_verbose(verbose);
    if let Some(capacity) = options.capacity {
        config = config.with_capacity(capacity);
    }

    let mut runner = ScriptRunner::new(config);
    for line in &lines {
        let output = runner
            .execute(line)
            .with_context(|| format!("script {} failed", path.display()))?;
        println!("{}", output);
    }

    if options.profile {
        if let Some(tree) = runner.tree() {
            if let Some(profile) = tree.space_profile() {
                eprintln!("{}", profile.report());
            }
            eprintln!("{}", tree.version_report());
        }
    }

    Ok(())
}

fn run_kth(path: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read input {}", path.display()))?;
    let batch = parse_kth_batch(&text)
        .with_context(|| format!("failed to parse input {}", path.display()))?;

    let tree = OrderStatisticTree::from_values(&batch.values)
        .context("failed to build prefix versions")?;

    for (idx, &(lo, hi, k)) in batch.queries.iter().enumerate() {
        let value = tree
            .kth_smallest(lo, hi, k)
            .with_context(|| format!("query {} ({} {} {}) failed", idx + 1, lo, hi, k))?;
        println!("{}", value);
    }

    Ok(())
}
