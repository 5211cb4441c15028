//! Periodic snapshots of a training run, so it can be resumed later.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use brain::artifact::{self, ArtifactKind};
use brain::Genome;

use crate::config::Config;
use crate::driver::Reporter;
use crate::error::ArenaError;
use crate::ledger::GenomeId;
use crate::population::{Champion, GenerationReport, Neat, Pool, Population};

pub const CHECKPOINT: ArtifactKind = ArtifactKind {
    magic: *b"NPCK",
    name: "checkpoint",
    version: 2,
};

/// Population state between two generations
#[derive(Serialize, Deserialize)]
pub struct Checkpoint {
    /// Next generation to evaluate
    pub generation: usize,
    pub first_id: GenomeId,
    /// Serve seed of the run, so a resumed run keeps drawing from it
    pub seed: u64,
    pub pool: Pool,
    pub champion: Option<Champion<Genome>>,
    pub config: Config,
}

/// Borrowed twin of [`Checkpoint`]; encodes to the same bytes
#[derive(Serialize)]
struct CheckpointRef<'a> {
    generation: usize,
    first_id: GenomeId,
    seed: u64,
    pool: &'a Pool,
    champion: Option<&'a Champion<Genome>>,
    config: &'a Config,
}

impl Checkpoint {
    /// Write the state of `population` without copying it
    pub fn write<P: AsRef<Path>>(population: &Neat, seed: u64, path: P) -> Result<(), ArenaError> {
        let snapshot = CheckpointRef {
            generation: population.generation(),
            first_id: population.first_id(),
            seed,
            pool: population.pool(),
            champion: population.champion(),
            config: population.config(),
        };
        Ok(artifact::save(&CHECKPOINT, &snapshot, path)?)
    }

    pub fn restore(self) -> Result<Neat, ArenaError> {
        Neat::restore(
            self.config,
            self.generation,
            self.pool,
            self.first_id,
            self.champion,
        )
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArenaError> {
        Ok(artifact::load(&CHECKPOINT, path)?)
    }
}

/// Writes a checkpoint every `every` generations
pub struct Checkpointer {
    dir: PathBuf,
    every: usize,
    seed: u64,
}

impl Checkpointer {
    pub fn new<P: Into<PathBuf>>(dir: P, every: usize, seed: u64) -> Self {
        Self {
            dir: dir.into(),
            every,
            seed,
        }
    }

    /// File holding the state before `generation` is evaluated
    pub fn path_for(&self, generation: usize) -> PathBuf {
        self.dir.join(format!("neat-checkpoint-{generation}.bin"))
    }
}

impl Reporter<Neat> for Checkpointer {
    fn end_generation(
        &mut self,
        population: &Neat,
        report: &GenerationReport,
    ) -> Result<(), ArenaError> {
        if self.every == 0 || (report.generation + 1) % self.every != 0 {
            return Ok(());
        }
        let path = self.path_for(population.generation());
        Checkpoint::write(population, self.seed, &path)?;
        log::info!("saved checkpoint {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::FitnessLedger;
    use brain::BrainError;

    fn evolved(generations: usize) -> Neat {
        let mut config = Config::default();
        config.evolution.population_size = 4;
        let mut population = Neat::new(config).unwrap();
        for _ in 0..generations {
            let mut ledger = FitnessLedger::new();
            for (index, (id, _)) in population.genomes().iter().enumerate() {
                ledger.credit(*id, index as f32 + 1.0);
            }
            population.advance(&ledger).unwrap();
        }
        population
    }

    #[test]
    fn test_checkpoint_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cp.bin");
        let population = evolved(2);

        Checkpoint::write(&population, 21, &path).unwrap();
        let loaded = Checkpoint::load(&path).unwrap();
        assert_eq!(loaded.generation, 2);
        assert_eq!(loaded.seed, 21);
        assert_eq!(loaded.first_id, population.first_id());

        let restored = loaded.restore().unwrap();
        assert_eq!(restored.generation(), 2);
        assert_eq!(restored.genomes(), population.genomes());
        assert_eq!(restored.champion(), population.champion());
        assert_eq!(restored.config(), population.config());
    }

    #[test]
    fn test_winner_file_is_not_a_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("winner.bin");
        let population = evolved(0);
        brain::save_winner(&population.genomes()[0].1, &path).unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(ArenaError::Brain(BrainError::BadMagic { .. }))
        ));
    }

    #[test]
    fn test_checkpointer_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut checkpointer = Checkpointer::new(dir.path(), 2, 9);
        let mut population = evolved(0);

        for _ in 0..4 {
            let mut ledger = FitnessLedger::new();
            for (id, _) in population.genomes() {
                ledger.credit(*id, 1.0);
            }
            let report = population.advance(&ledger).unwrap();
            checkpointer.end_generation(&population, &report).unwrap();
        }

        assert!(!checkpointer.path_for(1).exists());
        assert!(checkpointer.path_for(2).exists());
        assert!(!checkpointer.path_for(3).exists());
        assert!(checkpointer.path_for(4).exists());
        let latest = Checkpoint::load(checkpointer.path_for(4)).unwrap();
        assert_eq!((latest.generation, latest.seed), (4, 9));
    }
}
