#[macro_use]
extern crate log;

pub mod generator;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use generator::{WorkUnit, WorkUnitGenerator};
use nodesig::{NodeSignature, Scheme};

/// Maximum number of nodes of a cluster.
const CLUSTER_MAX_NODES: usize = 5000;
/// Maximum number of work units running on a node.
const CLUSTER_MAX_UNITS_PER_NODE: usize = 300;

#[derive(Parser, Debug)]
#[command(name = "benchmark", about = "Node signature tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time the signature of every node of a random cluster.
    Bench {
        /// Number of nodes, each with its own accumulator.
        #[arg(short, long, default_value_t = 1)]
        nodes: usize,
        /// Number of work units running on each node.
        #[arg(short, long, default_value_t = CLUSTER_MAX_UNITS_PER_NODE)]
        units_per_node: usize,
        /// Number of trials to run. Reports the median.
        #[arg(long, default_value_t = 1)]
        trials: usize,
        /// Seed for the work unit generator.
        #[arg(long)]
        seed: Option<u64>,
        /// Signature scheme.
        #[arg(long, default_value_t = Scheme::NsgnV001)]
        scheme: Scheme,
    },
    /// Print the signature of the work units in a JSON file.
    Sign {
        /// JSON array of `{"Namespace": .., "Name": ..}` objects.
        #[arg(short, long)]
        input: PathBuf,
        /// Signature scheme.
        #[arg(long, default_value_t = Scheme::NsgnV001)]
        scheme: Scheme,
    },
    /// Check a signature against the work units in a JSON file.
    Check {
        /// JSON array of `{"Namespace": .., "Name": ..}` objects.
        #[arg(short, long)]
        input: PathBuf,
        /// The signature to check.
        #[arg(short, long)]
        signature: String,
        /// Signature scheme.
        #[arg(long, default_value_t = Scheme::NsgnV001)]
        scheme: Scheme,
    },
}

fn load_units(path: &Path) -> Result<Vec<WorkUnit>, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

fn build_signature(scheme: Scheme, units: &[WorkUnit]) -> NodeSignature {
    let mut ns = NodeSignature::with_scheme(scheme);
    for unit in units {
        ns.add(&unit.namespace, &unit.name);
    }
    ns
}

/// Signs every node of the cluster and returns the time spent, excluding
/// work unit generation.
fn stress_cluster(
    cluster: &[Vec<WorkUnit>],
    scheme: Scheme,
) -> Duration {
    let t1 = Instant::now();
    for units in cluster {
        let mut ns = build_signature(scheme, units);
        let _ = ns.digest();
    }
    Instant::now() - t1
}

fn median(mut results: Vec<Duration>) -> Duration {
    if results.is_empty() {
        return Duration::ZERO;
    }
    results.sort();
    let mid = results.len() / 2;
    if results.len() & 1 == 0 {
        (results[mid - 1] + results[mid]) / 2
    } else {
        results[mid]
    }
}

fn bench(
    nodes: usize,
    units_per_node: usize,
    trials: usize,
    seed: Option<u64>,
    scheme: Scheme,
) {
    if nodes > CLUSTER_MAX_NODES {
        warn!("{} nodes exceeds the expected cluster size of {}", nodes,
            CLUSTER_MAX_NODES);
    }
    debug!("nodes = {}", nodes);
    debug!("units_per_node = {}", units_per_node);
    debug!("scheme = {}", scheme);

    let mut g = WorkUnitGenerator::new(seed);
    let cluster: Vec<Vec<WorkUnit>> = (0..nodes)
        .map(|_| g.node(units_per_node))
        .collect();
    info!("generated {} work units", g.num_generated);

    let results: Vec<Duration> = (0..trials)
        .map(|trial| {
            let elapsed = stress_cluster(&cluster, scheme);
            debug!("trial {}: {:?}", trial, elapsed);
            elapsed
        })
        .collect();
    info!("nodes\tunits\ttrials\tmedian");
    info!("{}\t{}\t{}\t{:?}", nodes, units_per_node, trials, median(results));
}

fn main() -> ExitCode {
    env_logger::builder().filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Bench { nodes, units_per_node, trials, seed, scheme } => {
            bench(nodes, units_per_node, trials, seed, scheme);
            ExitCode::SUCCESS
        }
        Command::Sign { input, scheme } => match load_units(&input) {
            Ok(units) => {
                debug!("loaded {} work units", units.len());
                println!("{}", build_signature(scheme, &units).sign());
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        },
        Command::Check { input, signature, scheme } => {
            let units = match load_units(&input) {
                Ok(units) => units,
                Err(e) => {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            match build_signature(scheme, &units).check(&signature) {
                Ok(()) => {
                    info!("signature matches {} work units", units.len());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testdata() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../testdata/pods.json")
    }

    #[test]
    fn median_of_odd_and_even_trials() {
        let ms = Duration::from_millis;
        assert_eq!(median(vec![]), Duration::ZERO);
        assert_eq!(median(vec![ms(3), ms(1), ms(2)]), ms(2));
        assert_eq!(median(vec![ms(4), ms(1), ms(2), ms(3)]), Duration::from_micros(2500));
    }

    #[test]
    fn load_and_sign_testdata() {
        let units = load_units(&testdata()).unwrap();
        assert_eq!(units.len(), 36);
        let mut ns = build_signature(Scheme::NsgnV001, &units);
        assert_eq!(ns.sign(), "nsgnv00126a141d291bd24e4");
    }

    #[test]
    fn load_missing_file() {
        assert!(load_units(Path::new("does/not/exist.json")).is_err());
    }

    #[test]
    fn cli_parses_scheme() {
        let cli = Cli::try_parse_from([
            "benchmark", "sign", "--input", "pods.json", "--scheme", "nsv1",
        ]).unwrap();
        match cli.command {
            Command::Sign { scheme, .. } => assert_eq!(scheme, Scheme::NsV1),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from([
            "benchmark", "sign", "--input", "pods.json", "--scheme", "nsgnv002",
        ]).is_err());
    }
}
