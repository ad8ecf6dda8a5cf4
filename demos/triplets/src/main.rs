//! triplets — command-line driver for the rust_triplets simulator.
//!
//! Spawns a population, runs it to convergence, deadlock, or the tick
//! budget, and records every snapshot frame to CSV for later rendering.
//!
//! ```text
//! triplets --agents 30 --scenario B --dist-behind 1.5 --ticks 500
//! triplets --config demos/triplets/configs/shield.json --seed 9 -v
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tp_agent::Population;
use tp_core::{SimConfig, Tick};
use tp_graph::Dependency;
use tp_output::{CsvWriter, OutputWriter, SimOutputObserver};
use tp_sim::{Outcome, SimBuilder, SimObserver, SimSummary, TickStats};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "triplets")]
#[command(about = "Run a triplet-positioning simulation", long_about = None)]
struct Args {
    /// JSON configuration file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of agents (at least 3)
    #[arg(short, long)]
    agents: Option<usize>,

    /// Tick budget
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Scenario: A (midpoint) or B (shield-behind)
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// Distance behind the shield (scenario B)
    #[arg(long)]
    dist_behind: Option<f64>,

    /// Maximum step per tick in metres
    #[arg(long)]
    step: Option<f64>,

    /// Perception radius in metres (default: the map diagonal)
    #[arg(long)]
    perception: Option<f64>,

    /// Sleep this many milliseconds after each snapshot frame
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Directory for the CSV output
    #[arg(short, long, default_value = "output/triplets")]
    output: PathBuf,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Defaults, then the config file, then command-line overrides.
    fn resolve_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(agents) = self.agents {
            config.agent_count = agents;
        }
        if let Some(ticks) = self.ticks {
            config.max_ticks = ticks;
        }
        if let Some(scenario) = &self.scenario {
            config.scenario = scenario.clone();
        }
        if self.dist_behind.is_some() {
            config.dist_behind = self.dist_behind;
        }
        if self.step.is_some() {
            config.step_size = self.step;
        }
        if self.perception.is_some() {
            config.perception_radius = self.perception;
        }
        if self.pacing_ms.is_some() {
            config.pacing_ms = self.pacing_ms;
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<SimConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("installing tracing subscriber")
}

// ── Observer wrapper to count rows ────────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:          SimOutputObserver<W>,
    frames:         usize,
    snapshot_rows:  usize,
    promotions:     usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, frames: 0, snapshot_rows: 0, promotions: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_promotion(&mut self, tick: Tick, dependency: &Dependency) {
        self.promotions += 1;
        info!(%tick, %dependency, "agent promoted to root");
    }

    fn on_tick_end(&mut self, stats: &TickStats) {
        self.inner.on_tick_end(stats);
    }

    fn on_snapshot(&mut self, tick: Tick, population: &Population, dependencies: &[Dependency]) {
        self.frames += 1;
        self.snapshot_rows += population.len();
        self.inner.on_snapshot(tick, population, dependencies);
    }

    fn on_sim_end(&mut self, summary: &SimSummary) {
        self.inner.on_sim_end(summary);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = args.resolve_config()?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("=== triplets ===");
    println!(
        "Agents: {}  |  Scenario: {}  |  Ticks: {}  |  Seed: {}",
        config.effective_agent_count(),
        config.scenario,
        config.max_ticks,
        config.seed
    );
    println!();

    let mut sim = SimBuilder::new(config).build()?;
    println!(
        "Initial graph: {} dependencies, {} NonRoot agents",
        sim.graph.len(),
        sim.graph.non_root().len()
    );

    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let writer = CsvWriter::new(&args.output)?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer));

    let t0 = Instant::now();
    let summary = sim.run(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        warn!(error = %e, "output incomplete");
    }

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("{summary}");
    println!();
    println!("  snapshot frames     : {}", obs.frames);
    println!("  agent_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  promotions          : {}", obs.promotions);
    println!("  output directory    : {}", args.output.display());
    println!();

    println!("{:<8} {:<8} {:<10} {:<24}", "Agent", "Role", "Converged", "Position");
    println!("{}", "-".repeat(52));
    for agent in &sim.population {
        let p = agent.position();
        println!(
            "{:<8} {:<8} {:<10} ({:.3}, {:.3})",
            agent.id.0,
            if agent.is_root() { "root" } else { "nonroot" },
            if agent.is_root() && agent.has_converged() { "yes" } else { "no" },
            p.x,
            p.y,
        );
    }

    if summary.outcome == Outcome::Deadlocked {
        std::process::exit(2);
    }
    Ok(())
}
