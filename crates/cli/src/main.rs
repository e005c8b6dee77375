//! Cache replacement-policy simulator CLI.
//!
//! This binary provides a single entry point for policy experiments. It performs:
//! 1. **Run:** Drive one workload or trace through a cache and report statistics.
//! 2. **Compare:** Run the same workload under LRU, LIP and LRU-vs-LIP dueling side by side.
//! 3. **Workloads:** List the built-in workload presets.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use duelsim_core::config::{CacheConfig, Config, DuelingConfig, PolicyConfig};
use duelsim_core::sim::trace;
use duelsim_core::sim::{PRESETS, RunSummary, Simulator, Workload};

#[derive(Parser, Debug)]
#[command(
    name = "duelsim",
    author,
    version,
    about = "Cache replacement-policy simulator with set dueling",
    long_about = "Simulate a set-associative cache under a chosen replacement policy.\n\nExamples:\n  duelsim run --policy dueling --workload phase_change_light\n  duelsim run --config l1.json --trace accesses.txt --json\n  duelsim compare --workload stencil_light"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one workload or trace and print statistics.
    Run {
        /// Replacement policy (ignored when --config is given).
        #[arg(short, long, value_enum, default_value_t = PolicyArg::Lru)]
        policy: PolicyArg,

        /// Built-in workload preset (see `duelsim workloads`).
        #[arg(short, long, default_value = "streaming_light", conflicts_with = "trace")]
        workload: String,

        /// Address trace file, one address per line.
        #[arg(short, long)]
        trace: Option<PathBuf>,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit the run summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run one workload under LRU, LIP and LRU-vs-LIP dueling.
    Compare {
        /// Built-in workload preset.
        #[arg(short, long, default_value = "phase_change_light")]
        workload: String,

        /// Emit the summaries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List workload presets.
    Workloads,
}

/// Policies selectable from the command line with default parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Lru,
    Lip,
    Bip,
    Mru,
    Fifo,
    Plru,
    Random,
    Srrip,
    Brrip,
    /// LRU against LIP with set dueling.
    Dueling,
}

impl PolicyArg {
    fn to_config(self) -> PolicyConfig {
        self.to_possible_value()
            .and_then(|v| PolicyConfig::from_name(v.get_name()))
            .unwrap_or_default()
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            policy,
            workload,
            trace,
            config,
            json,
        } => cmd_run(policy, &workload, trace, config, json),
        Commands::Compare { workload, json } => cmd_compare(&workload, json),
        Commands::Workloads => {
            for name in PRESETS {
                println!("{name}");
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn lookup_workload(name: &str) -> Result<Workload, String> {
    Workload::preset(name)
        .ok_or_else(|| format!("unknown workload `{name}` (try `duelsim workloads`)"))
}

/// Runs one workload or trace through a cache built from `--config` or `--policy`.
fn cmd_run(
    policy: PolicyArg,
    workload: &str,
    trace_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), String> {
    let cache_config = match config_path {
        Some(path) => {
            let config =
                Config::from_file(&path).map_err(|e| format!("{}: {e}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded configuration");
            config.cache
        }
        None => CacheConfig {
            policy: policy.to_config(),
            ..CacheConfig::default()
        },
    };

    let mut sim = Simulator::new(&cache_config).map_err(|e| e.to_string())?;
    let summary = match trace_path {
        Some(path) => {
            let addrs =
                trace::read_trace_file(&path).map_err(|e| format!("{}: {e}", path.display()))?;
            sim.run_trace(&addrs)
        }
        None => sim.run_workload(lookup_workload(workload)?),
    }
    .map_err(|e| e.to_string())?;

    if json {
        print_json(&summary)
    } else {
        print_summary(&summary);
        Ok(())
    }
}

/// Runs `workload` under LRU, LIP and dueling LRU-vs-LIP with the default geometry.
fn cmd_compare(workload: &str, json: bool) -> Result<(), String> {
    let workload = lookup_workload(workload)?;
    let policies = [
        PolicyConfig::Lru,
        PolicyConfig::Lip,
        PolicyConfig::Dueling(Box::new(DuelingConfig::default())),
    ];

    let mut summaries = Vec::with_capacity(policies.len());
    for policy in policies {
        let config = CacheConfig {
            policy,
            ..CacheConfig::default()
        };
        let mut sim = Simulator::new(&config).map_err(|e| e.to_string())?;
        summaries.push(sim.run_workload(workload).map_err(|e| e.to_string())?);
    }

    if json {
        return print_json(&summaries);
    }
    println!("{:<20} {:>12} {:>12} {:>10}", "policy", "accesses", "misses", "miss rate");
    for s in &summaries {
        println!(
            "{:<20} {:>12} {:>12} {:>9.2}%",
            s.policy,
            s.stats.accesses,
            s.stats.misses,
            s.stats.miss_rate() * 100.0
        );
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("policy: {}", summary.policy);
    for phase in &summary.phases {
        let duel = match (phase.psel, phase.winner) {
            (Some(psel), Some(winner)) => format!("  psel={psel} winner={winner:?}"),
            _ => String::new(),
        };
        println!(
            "  {:<20} accesses={:<10} misses={:<10} miss_rate={:.2}%{duel}",
            phase.name,
            phase.accesses,
            phase.misses,
            phase.miss_rate * 100.0
        );
    }
    summary.stats.print();
}
