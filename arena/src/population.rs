//! Evolution backends.
//!
//! The driver only needs a [`Population`]: genomes with ids, a way to turn a
//! genome into a brain, and a way to move on to the next generation once the
//! pairwise trials have filled a fitness ledger. [`Neat`] adapts an `oxineat`
//! population of `oxineat-nn` genomes to that interface.

use oxineat_nn::genomics::{GeneticConfig, History};
use serde::{Deserialize, Serialize};

use brain::{DecisionFn, Genome, Network};

use crate::config::Config;
use crate::error::ArenaError;
use crate::ledger::{FitnessLedger, GenomeId};

/// Speciated NEAT population as stored by `oxineat`
pub type Pool = oxineat::Population<GeneticConfig, History, Genome>;

/// The best genome seen so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion<G> {
    pub id: GenomeId,
    pub generation: usize,
    pub fitness: f32,
    pub genome: G,
}

/// Summary of one evaluated generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub population_size: usize,
    pub species: usize,
    pub best_id: GenomeId,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub stdev_fitness: f32,
    /// Genomes that had no ledger entry and were scored as zero
    pub unevaluated: usize,
    pub trials: usize,
    pub ticks: u64,
    pub elapsed_secs: f64,
}

pub trait Population {
    type Genome: Clone;
    type Brain: DecisionFn;

    /// Index of the generation about to be evaluated
    fn generation(&self) -> usize;

    fn genomes(&self) -> &[(GenomeId, Self::Genome)];

    fn brain(&self, genome: &Self::Genome) -> Result<Self::Brain, ArenaError>;

    /// Score the current generation from `ledger` and replace it with the next one
    fn advance(&mut self, ledger: &FitnessLedger) -> Result<GenerationReport, ArenaError>;

    fn champion(&self) -> Option<&Champion<Self::Genome>>;
}

/// `oxineat` population with arena ids and champion tracking.
///
/// Ids are handed out afresh every generation, in the order `oxineat`
/// evaluates its genomes, so the ledger totals can be fed back positionally.
pub struct Neat {
    config: Config,
    pool: Pool,
    generation: usize,
    members: Vec<(GenomeId, Genome)>,
    next_id: GenomeId,
    champion: Option<Champion<Genome>>,
}

impl Neat {
    /// Random initial population
    pub fn new(config: Config) -> Result<Self, ArenaError> {
        config.validate()?;
        let pool = Pool::new(
            config.evolution.population_config()?,
            config.genetics.to_genetic_config(),
        );
        let mut neat = Self {
            config,
            pool,
            generation: 0,
            members: Vec::new(),
            next_id: 0,
            champion: None,
        };
        neat.refresh();

        log::info!(
            "created population of {} genomes in {} species",
            neat.members.len(),
            neat.pool.species().count()
        );
        Ok(neat)
    }

    /// Rebuild from saved state; ids continue from `first_id`
    pub fn restore(
        config: Config,
        generation: usize,
        pool: Pool,
        first_id: GenomeId,
        champion: Option<Champion<Genome>>,
    ) -> Result<Self, ArenaError> {
        config.validate()?;
        let mut neat = Self {
            config,
            pool,
            generation,
            members: Vec::new(),
            next_id: first_id,
            champion,
        };
        neat.refresh();
        if neat.members.is_empty() {
            return Err(ArenaError::EmptyPopulation);
        }
        for (_, genome) in &neat.members {
            brain::network::validate(genome)?;
        }
        Ok(neat)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Id of the first genome in the current generation
    pub fn first_id(&self) -> GenomeId {
        self.members.first().map_or(self.next_id, |(id, _)| *id)
    }

    /// Snapshot the pool's genomes in evaluation order under fresh ids
    fn refresh(&mut self) {
        let mut members = Vec::with_capacity(self.config.evolution.population_size);
        for genome in self.pool.genomes() {
            members.push((self.next_id, genome.clone()));
            self.next_id += 1;
        }
        self.members = members;
    }
}

impl Population for Neat {
    type Genome = Genome;
    type Brain = Network;

    fn generation(&self) -> usize {
        self.generation
    }

    fn genomes(&self) -> &[(GenomeId, Genome)] {
        &self.members
    }

    fn brain(&self, genome: &Genome) -> Result<Network, ArenaError> {
        Ok(Network::from_genome(genome)?)
    }

    fn advance(&mut self, ledger: &FitnessLedger) -> Result<GenerationReport, ArenaError> {
        if self.members.is_empty() {
            return Err(ArenaError::EmptyPopulation);
        }

        let mut unevaluated = 0;
        let scores: Vec<f32> = self
            .members
            .iter()
            .map(|(id, _)| match ledger.get(*id) {
                Some(fitness) => fitness.max(0.0),
                None => {
                    unevaluated += 1;
                    0.0
                }
            })
            .collect();
        if unevaluated > 0 {
            log::warn!(
                "{} genomes of generation {} were never evaluated, scoring them 0",
                unevaluated,
                self.generation
            );
        }

        let count = scores.len() as f32;
        let mean = scores.iter().sum::<f32>() / count;
        let variance = scores.iter().map(|f| (f - mean).powi(2)).sum::<f32>() / count;
        // First maximum wins
        let (best_index, best_fitness) = scores
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (index, fitness)| {
                if fitness > best.1 {
                    (index, fitness)
                } else {
                    best
                }
            });
        let (best_id, best_genome) = &self.members[best_index];

        let report = GenerationReport {
            generation: self.generation,
            population_size: self.members.len(),
            species: self.pool.species().count(),
            best_id: *best_id,
            best_fitness,
            mean_fitness: mean,
            stdev_fitness: variance.sqrt(),
            unevaluated,
            trials: 0,
            ticks: 0,
            elapsed_secs: 0.0,
        };

        if self
            .champion
            .as_ref()
            .map_or(true, |champion| best_fitness > champion.fitness)
        {
            log::debug!(
                "new champion: genome {} with fitness {}",
                best_id,
                best_fitness
            );
            let mut genome = best_genome.clone();
            genome.set_fitness(best_fitness);
            self.champion = Some(Champion {
                id: *best_id,
                generation: self.generation,
                fitness: best_fitness,
                genome,
            });
        }

        // Same traversal order as the member snapshot
        let mut fitness = scores.into_iter();
        self.pool.evaluate_fitness(|_| fitness.next().unwrap_or(0.0));
        if let Err(e) = self.pool.evolve() {
            log::warn!(
                "generation {}: {}, starting over from fresh genomes",
                self.generation,
                e
            );
            self.pool.reset();
        }

        self.generation += 1;
        self.refresh();
        Ok(report)
    }

    fn champion(&self) -> Option<&Champion<Genome>> {
        self.champion.as_ref()
    }
}
