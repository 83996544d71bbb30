//! Headless Lattice Simulation
//!
//! Runs the engine without a renderer, writing JSON snapshots on the render
//! cadence so an external viewer or analysis script can follow along.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use sites_core::config::DEFAULT_CONFIG_PATH;
use sites_core::output::{
    write_stats, SnapshotGenerator, SnapshotWriter, StatsCollector, STATS_FILE_NAME,
};
use sites_core::{
    build_simulation, HaltPolicy, SimConfig, SimError, SimRng, SimulationClock, StopReason,
    StopSignal,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "sites")]
#[command(about = "A lattice model of cultural dissemination")]
struct Args {
    /// TOML configuration file (defaults to sites.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate; 0 runs until interrupted
    #[arg(long)]
    ticks: Option<u64>,

    /// Frames between snapshots
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Lattice width
    #[arg(long)]
    width: Option<usize>,

    /// Lattice height
    #[arg(long)]
    height: Option<usize>,

    /// Directory for snapshots and statistics
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Let sway and mill results leave [0, 1]
    #[arg(long)]
    no_clamp: bool,

    /// What to do when the escape dimension exceeds 1
    #[arg(long, value_enum, default_value_t = EscapePolicy::Stop)]
    on_escape: EscapePolicy,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EscapePolicy {
    /// Stop ticking and write the final snapshot
    Stop,
    /// Keep ticking
    Ignore,
    /// Exit the process immediately, writing nothing further
    Exit,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    if args.print_default_config {
        return match SimConfig::default().to_toml() {
            Ok(toml) => {
                print!("{}", toml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Loads the configuration file and applies command line overrides.
fn load_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => SimConfig::from_file(DEFAULT_CONFIG_PATH)?,
        None => SimConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.run.step_limit = ticks;
    }
    if let Some(interval) = args.snapshot_interval {
        config.run.snapshot_interval = interval;
    }
    if let Some(width) = args.width {
        config.lattice.width = width;
    }
    if let Some(height) = args.height {
        config.lattice.height = height;
    }
    if let Some(dir) = &args.output_dir {
        config.run.output_dir = dir.clone();
    }
    if args.no_clamp {
        config.model.clamp_mutations = false;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = load_config(args)?;

    println!("Sites: Lattice Cultural Dissemination");
    println!("=====================================");
    println!("Seed: {}", config.run.seed);
    println!(
        "Lattice: {}x{}, {} dimensions",
        config.lattice.width, config.lattice.height, config.lattice.dimensions
    );
    if config.run.step_limit == 0 {
        println!("Ticks: unbounded");
    } else {
        println!("Ticks: {}", config.run.step_limit);
    }
    println!("Snapshot interval: {}", config.run.snapshot_interval);
    println!("Clamp mutations: {}", config.model.clamp_mutations);
    println!();

    let mut rng = SimRng::seed_from_u64(config.run.seed);
    let mut sim = build_simulation(&config, &mut rng.0)?;

    let writer = SnapshotWriter::new(&config.run.output_dir);
    writer.ensure_dirs()?;
    let mut generator = SnapshotGenerator::new(config.run.histogram_bins);
    let mut stats = StatsCollector::new();
    info!(run_id = %generator.run_id(), "Starting run");

    let initial = generator.generate(&sim, 0, "simulation_start");
    stats.record(0, &initial.metrics);
    writer.write_to_dir(&initial)?;
    writer.write_current_state(&initial)?;
    println!(
        "Wrote initial snapshot ({} regions, mean similarity {:.3})",
        initial.metrics.region_count, initial.metrics.mean_edge_similarity
    );

    let halt_policy = match args.on_escape {
        EscapePolicy::Ignore => HaltPolicy::Ignore,
        EscapePolicy::Stop | EscapePolicy::Exit => HaltPolicy::Stop,
    };
    let mut clock = SimulationClock::new(config.run.step_limit, config.run.snapshot_interval)
        .with_halt_policy(halt_policy);

    // Ctrl-C ends the run after the current frame so final output still lands
    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_stop.request()) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let summary = clock.run(
        &mut sim,
        &mut rng.0,
        |_| stop.is_requested(),
        |sim, step| {
            let snapshot = generator.generate(sim, step, "periodic");
            stats.record(step, &snapshot.metrics);
            if let Err(e) = writer.write_to_dir(&snapshot) {
                warn!(step, "Could not write snapshot: {}", e);
            }
            if let Err(e) = writer.write_current_state(&snapshot) {
                warn!(step, "Could not write current state: {}", e);
            }
            println!(
                "[Step {:>9}] regions: {:>4}, mean similarity: {:.3}",
                step, snapshot.metrics.region_count, snapshot.metrics.mean_edge_similarity
            );
        },
    );

    if let StopReason::Halted(escape) = summary.stop {
        println!(
            "Escape at step {}: site ({}, {}) dimension {} reached {:.4}",
            summary.steps, escape.site.x, escape.site.y, escape.dimension, escape.value
        );
        if args.on_escape == EscapePolicy::Exit {
            std::process::exit(0);
        }
    }

    if summary.stop == StopReason::Cancelled {
        println!("Interrupted at step {}; writing final state.", summary.steps);
    }

    let trigger = match summary.stop {
        StopReason::Halted(_) => "escape",
        StopReason::StepLimit | StopReason::Cancelled => "simulation_end",
    };
    let final_snapshot = generator.generate(&sim, summary.steps, trigger);
    stats.record(summary.steps, &final_snapshot.metrics);
    writer.write_to_dir(&final_snapshot)?;
    writer.write_current_state(&final_snapshot)?;

    let stats = stats.finish(&summary);
    write_stats(&stats, writer.root().join(STATS_FILE_NAME))?;

    println!();
    println!(
        "Simulation complete. Ran {} ticks ({} interactions, {} drifts).",
        summary.steps, summary.interactions, summary.drifts
    );
    println!(
        "Final state: {} regions, mean similarity {:.3}",
        final_snapshot.metrics.region_count, final_snapshot.metrics.mean_edge_similarity
    );
    println!("Generated {} snapshots.", generator.snapshot_count());

    Ok(())
}
