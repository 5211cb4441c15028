//! Training arena for Pong paddle brains
//!
//! Pairs genomes in trials, accumulates their rally hits as fitness, drives the
//! population through generations and hosts the interactive game.

pub mod checkpoint;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod gui;
pub mod ledger;
pub mod population;
pub mod session;
pub mod stats;
pub mod trial;

pub use config::Config;
pub use driver::{
    check_generations, generation_seed, Driver, GenerationRun, PairSchedule, Pairing, Progress,
    Reporter, RunStatus,
};
pub use error::ArenaError;
pub use events::{EventSource, KeyState, Signal, TickInput, Unattended};
pub use ledger::{FitnessLedger, GenomeId};
pub use population::{Champion, GenerationReport, Neat, Pool, Population};
pub use session::{PlaySession, SessionStatus};
pub use trial::{evaluate_pair, Trial, TrialEnd, TrialRules, TrialState};
