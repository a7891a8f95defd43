use anyhow::{Context, Result};
use boid_cli::{AsciiCanvas, FrameStats, Session};
use boid_evolve::Optimizer;
use boid_shared::{EvolutionConfig, MutationPolicy};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Boid flocking simulation and parameter evolution", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for boid coefficients that maximise mean flock speed
    Evolve(EvolveArgs),
    /// Run a live flock headlessly
    Simulate(SimulateArgs),
}

#[derive(clap::Args, Debug)]
struct EvolveArgs {
    /// JSON file with an evolution config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    generations: Option<usize>,

    #[arg(short, long)]
    population: Option<usize>,

    /// Boids per fitness evaluation
    #[arg(long)]
    flock_size: Option<usize>,

    /// Simulation steps per fitness evaluation
    #[arg(long)]
    steps: Option<usize>,

    #[arg(long)]
    mutation_rate: Option<f32>,

    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    AllFields,
    SeparationOnly,
}

impl From<PolicyArg> for MutationPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::AllFields => MutationPolicy::AllFields,
            PolicyArg::SeparationOnly => MutationPolicy::SeparationOnly,
        }
    }
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    #[arg(long, default_value_t = 1600.0)]
    width: f32,

    #[arg(long, default_value_t = 900.0)]
    height: f32,

    #[arg(short, long, default_value_t = 300)]
    boids: usize,

    #[arg(short, long, default_value_t = 600)]
    frames: usize,

    /// Tuning key presses applied before the first frame (q/a, w/s, e/d)
    #[arg(short, long, default_value = "")]
    keys: String,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the final frame as ASCII art
    #[arg(long)]
    ascii: bool,

    #[arg(long, default_value_t = 100)]
    cols: usize,

    #[arg(long, default_value_t = 30)]
    rows: usize,
}

impl EvolveArgs {
    fn load_config(&self) -> Result<EvolutionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                EvolutionConfig::from_json(&json)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => EvolutionConfig::default(),
        };

        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(flock_size) = self.flock_size {
            config.flock_size = flock_size;
        }
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(rate) = self.mutation_rate {
            config.mutation.rate = rate;
        }
        if let Some(policy) = self.policy {
            config.mutation.policy = policy.into();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn run_evolve(args: &EvolveArgs) -> Result<()> {
    let config = args.load_config()?;
    log::info!(
        "Evolving: {} generations, population {}, {} boids x {} steps per evaluation",
        config.generations,
        config.population_size,
        config.flock_size,
        config.steps
    );

    let mut optimizer = Optimizer::flock_speed(config).context("Invalid evolution config")?;
    let evolution = optimizer.run();
    let best = evolution
        .best()
        .context("Evolution produced an empty population")?;

    if let Some(fitness) = evolution.history.last().and_then(|r| r.best_fitness()) {
        log::info!("Best fitness {fitness:.4}: {best}");
    }
    println!(
        "{}",
        serde_json::to_string_pretty(best).context("Failed to encode best genome")?
    );
    Ok(())
}

fn run_simulate(args: &SimulateArgs) -> Result<()> {
    let mut session = Session::new((args.width, args.height), args.boids, args.seed)
        .context("Failed to start session")?;
    for key in args.keys.chars() {
        if session.press(key).is_none() {
            log::warn!("Ignoring unknown tuning key {key:?}");
        }
    }

    let mut stats = FrameStats::default();
    let mut canvas = AsciiCanvas::new(args.cols, args.rows, session.viewport());
    for frame in 0..args.frames {
        stats.reset();
        if args.ascii && frame + 1 == args.frames {
            canvas.clear();
            canvas.set_world(session.viewport());
            session.advance(&mut canvas);
        } else {
            session.advance(&mut stats);
        }

        if frame % 60 == 0 {
            log::debug!(
                "frame {frame}: mean speed {:.3}, mean intensity {:.3}",
                session.flock.mean_speed(),
                stats.mean_intensity()
            );
        }
    }

    log::info!(
        "Finished {} frames, mean speed {:.3}",
        session.frame(),
        session.flock.mean_speed()
    );
    if args.ascii {
        print!("{}", canvas.render());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    match &args.command {
        Command::Evolve(evolve) => run_evolve(evolve).context("Evolution failed"),
        Command::Simulate(simulate) => run_simulate(simulate).context("Simulation failed"),
    }
}
