//! neat-pong - CLI entry point
//!
//! Evolve Pong paddles and play against the result.

use arena::checkpoint::{Checkpoint, Checkpointer};
use arena::config::{Config, DEFAULT_CONFIG_PATH};
use arena::driver::{check_generations, Driver, RunStatus};
use arena::events::Unattended;
use arena::population::{Neat, Population};
use arena::session::PlaySession;
use arena::stats::{LogReporter, Statistics};
use arena::trial::TrialRules;
use arena::{gui, ArenaError};
use brain::Network;
use clap::{Parser, Subcommand};
use game_core::Simulation;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "neat-pong")]
#[command(version)]
#[command(about = "Neuro-evolution of Pong paddles, and a game against the winner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve a population and save the best genome
    Train {
        /// Configuration file (TOML)
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Number of generations; defaults to evolution.generations
        #[arg(short, long)]
        generations: Option<usize>,

        /// Where to write the winner
        #[arg(short, long, default_value = "winner.bin")]
        output: PathBuf,

        /// Directory for population checkpoints
        #[arg(long, default_value = ".")]
        checkpoint_dir: PathBuf,

        /// Write a checkpoint every N generations
        #[arg(long, default_value = "1")]
        checkpoint_every: usize,

        /// Continue from a checkpoint instead of a fresh population
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Write per-generation statistics as JSON
        #[arg(long)]
        stats: Option<PathBuf>,

        /// Show the trials in a window while training
        #[arg(short, long)]
        watch: bool,
    },

    /// Play against a trained winner (W/S move the left paddle)
    Play {
        /// Winner file written by `train`
        #[arg(short, long, default_value = "winner.bin")]
        model: PathBuf,

        /// Show the rally counter
        #[arg(long)]
        show_hits: bool,

        /// Random seed for serves
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate default configuration file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,
    },
}

struct TrainArgs {
    config: PathBuf,
    generations: Option<usize>,
    output: PathBuf,
    checkpoint_dir: PathBuf,
    checkpoint_every: usize,
    resume: Option<PathBuf>,
    seed: Option<u64>,
    stats: Option<PathBuf>,
    watch: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            config,
            generations,
            output,
            checkpoint_dir,
            checkpoint_every,
            resume,
            seed,
            stats,
            watch,
        } => train(TrainArgs {
            config,
            generations,
            output,
            checkpoint_dir,
            checkpoint_every,
            resume,
            seed,
            stats,
            watch,
        }),

        Commands::Play {
            model,
            show_hits,
            seed,
        } => play(model, show_hits, seed),

        Commands::InitConfig { output } => Ok(Config::default().save(output)?),
    }
}

fn train(args: TrainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (population, seed) = match &args.resume {
        Some(path) => {
            let checkpoint = Checkpoint::load(path)?;
            log::info!(
                "resuming from {} at generation {}",
                path.display(),
                checkpoint.generation
            );
            let seed = checkpoint.seed;
            (checkpoint.restore()?, seed)
        }
        None => {
            let config = Config::load_or_default(&args.config)?;
            (Neat::new(config)?, args.seed.unwrap_or_else(rand::random))
        }
    };

    let config = population.config().clone();
    let generations = args.generations.unwrap_or(config.evolution.generations);
    check_generations(generations)?;

    let mut driver = Driver::new(population, TrialRules::from(&config.trial), seed);
    driver.add_reporter(Box::new(LogReporter));
    if let Some(path) = args.stats {
        driver.add_reporter(Box::new(Statistics::with_export(path)));
    }
    driver.add_reporter(Box::new(Checkpointer::new(
        args.checkpoint_dir,
        args.checkpoint_every,
        seed,
    )));

    log::info!(
        "training {} genomes for {} generations",
        config.evolution.population_size,
        generations
    );

    if args.watch {
        gui::watch(driver, generations, args.output)?;
        return Ok(());
    }

    match driver.run(generations, &mut Unattended)? {
        RunStatus::Completed { .. } => {
            let champion = driver
                .population()
                .champion()
                .ok_or(ArenaError::NoChampion)?;
            brain::save_winner(&champion.genome, &args.output)?;
            log::info!(
                "saved winner (genome {}, fitness {:.1}) to {}",
                champion.id,
                champion.fitness,
                args.output.display()
            );
        }
        RunStatus::Interrupted { generation } => {
            log::warn!("stopped during generation {}, nothing saved", generation);
        }
    }
    Ok(())
}

fn play(
    model: PathBuf,
    show_hits: bool,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let genome = brain::load_winner(&model)?;
    let network = Network::from_genome(&genome)?;
    log::info!("loaded winner from {}", model.display());

    let sim = Simulation::new(
        game_core::Config::new(),
        seed.unwrap_or_else(rand::random),
    );
    gui::play(PlaySession::new(sim, network), show_hits)?;
    Ok(())
}
