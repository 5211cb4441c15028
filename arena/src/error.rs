use std::path::PathBuf;
use thiserror::Error;

use brain::BrainError;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("cannot encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Brain(#[from] BrainError),

    #[error("cannot encode statistics: {0}")]
    Stats(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("population is empty")]
    EmptyPopulation,

    #[error("{genomes} genomes but {brains} brains")]
    BrainCount { genomes: usize, brains: usize },

    #[error("no genome has been evaluated yet")]
    NoChampion,
}
