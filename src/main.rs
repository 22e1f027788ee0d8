use std::{io::BufReader, path::PathBuf, process::ExitCode, sync::Arc};

use bounded_vertex_cover::{
    input::InputError,
    memory::{AllocatorGauge, TrackingAllocator},
    parse_input, Edge, Limits, Method, Node, Outcome, PenaltyRule, VertexCover,
};
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

/// Finds vertex covers of size at most k on a random preferential-attachment
/// graph, or on a graph read from a file.
#[derive(Parser)]
#[command(name = "vertex-cover-demo", version)]
struct Cli {
    /// Number of nodes of the generated graph
    #[arg(short, long, default_value_t = 5)]
    nodes: u32,

    /// Edges added for every new node of the generated graph
    #[arg(short, long, default_value_t = 3)]
    attach: u32,

    /// Seed for the graph generator
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Read the graph from a file (`<nodes> <edges>` header, then `<u> <v>` lines)
    #[arg(short, long, conflicts_with_all = ["nodes", "attach", "seed"])]
    input: Option<PathBuf>,

    /// Largest cover size to search for
    #[arg(short, default_value_t = 3)]
    k: usize,

    /// Search strategy, may be repeated
    #[arg(
        short,
        long = "method",
        value_parser = parse_method,
        default_values_t = [Method::BruteForce, Method::Greedy]
    )]
    methods: Vec<Method>,

    /// Wall-clock limit per search, in seconds
    #[arg(long, env = "VC_TIME_LIMIT", default_value_t = 60.0)]
    time_limit: f64,

    /// Resident memory ceiling per search, in bytes
    #[arg(long, env = "VC_MEMORY_LIMIT", default_value_t = 1 << 30)]
    memory_limit: usize,

    /// Count heap bytes only instead of the resident set size
    #[arg(long)]
    heap_only: bool,

    /// How greedy scores node pairs joined by parallel edges
    #[arg(long, value_enum, default_value_t = Rule::Any)]
    penalty_rule: Rule,

    /// Log search progress
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Rule {
    Any,
    Single,
}

impl From<Rule> for PenaltyRule {
    fn from(value: Rule) -> Self {
        match value {
            Rule::Any => PenaltyRule::AnyMultiplicity,
            Rule::Single => PenaltyRule::SingleEdgeOnly,
        }
    }
}

fn parse_method(s: &str) -> Result<Method, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Barabási–Albert preferential attachment: starts from `m` isolated nodes
/// and links every new node to `m` distinct existing nodes, chosen with
/// probability proportional to their degree.
fn preferential_attachment(n: u32, m: u32, rng: &mut StdRng) -> (Vec<Node>, Vec<Edge>) {
    let nodes: Vec<Node> = (0..n).collect();
    if m == 0 || m >= n {
        return (nodes, Vec::new());
    }
    let mut edges = Vec::new();
    let mut repeated: Vec<Node> = Vec::new();
    let mut targets: Vec<Node> = (0..m).collect();
    for source in m..n {
        for &target in &targets {
            edges.push((source, target));
        }
        repeated.extend_from_slice(&targets);
        repeated.extend(std::iter::repeat(source).take(m as usize));

        let mut next = Vec::with_capacity(m as usize);
        while next.len() < m as usize {
            if let Some(&candidate) = repeated.choose(rng) {
                if !next.contains(&candidate) {
                    next.push(candidate);
                }
            }
        }
        targets = next;
    }
    (nodes, edges)
}

fn label(method: Method) -> &'static str {
    match method {
        Method::BruteForce => "Brute",
        Method::Greedy => "Greedy",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let limits = match Limits::from_secs_f64(cli.time_limit, cli.memory_limit) {
        Ok(limits) => limits,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let (nodes, edges) = match &cli.input {
        Some(path) => {
            let parsed = std::fs::File::open(path)
                .map_err(InputError::from)
                .and_then(|file| parse_input(BufReader::new(file)));
            match parsed {
                Ok(graph) => graph,
                Err(e) => {
                    eprintln!("error: {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            let mut rng = StdRng::seed_from_u64(cli.seed);
            preferential_attachment(cli.nodes, cli.attach, &mut rng)
        }
    };

    let mut engine = VertexCover::new().with_penalty_rule(cli.penalty_rule.into());
    if cli.heap_only {
        engine = engine.with_gauge(Arc::new(AllocatorGauge));
    }
    if let Err(e) = engine.set_graph(nodes, edges) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    for method in cli.methods {
        match engine.get_cover(cli.k, method, limits) {
            Ok(report) => {
                println!("{} Cover: {}", label(method), report.cover);
                if report.outcome != Outcome::Found {
                    println!("  ({:?} after {:.3?})", report.outcome, report.elapsed);
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
