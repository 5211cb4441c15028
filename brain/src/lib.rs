//! Paddle brains for the Pong arena
//!
//! Decision functions, the NEAT genomes they are built from, and the winner
//! artifact (postcard on disk).

pub mod action;
pub mod artifact;
pub mod decision;
pub mod error;
pub mod network;

pub use action::{Action, Observation};
pub use artifact::{load_winner, save_winner, ArtifactKind, WINNER};
pub use decision::{Controller, DecisionFn};
pub use error::BrainError;
pub use network::{Activation, GeneticsConfig, Genome, Network};
