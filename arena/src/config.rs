//! Training configuration, read from a TOML file.
//!
//! Every section and field is optional; anything left out takes its default.

use oxineat::PopulationConfig;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

use brain::GeneticsConfig;

use crate::error::ArenaError;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub evolution: EvolutionConfig,
    pub genetics: GeneticsConfig,
    pub trial: TrialConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Best genomes of each species copied unchanged into the next generation
    pub elitism: usize,
    /// Fraction of each species allowed to reproduce
    pub survival_threshold: f32,
    /// Genetic distance at which a genome founds a new species
    pub compatibility_threshold: f32,
    /// Chance that a genome drifted from its species is moved to another one
    pub adoption_rate: f32,
    /// Chance that a child has two parents rather than one
    pub crossover_chance: f32,
    pub interspecies_mating_chance: f32,
    /// Generations without improvement before a species is penalised
    pub max_stagnation: usize,
    /// Share of offspring a stagnant species loses
    pub stagnation_penalty: f32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 20,
            elitism: 2,
            survival_threshold: 0.2,
            compatibility_threshold: 3.0,
            adoption_rate: 1.0,
            crossover_chance: 0.6,
            interspecies_mating_chance: 0.001,
            max_stagnation: 20,
            stagnation_penalty: 1.0,
        }
    }
}

impl EvolutionConfig {
    /// Settings for the `oxineat` population
    pub fn population_config(&self) -> Result<PopulationConfig, ArenaError> {
        let size = NonZeroUsize::new(self.population_size)
            .ok_or_else(|| invalid_config("evolution.population_size must be at least 2"))?;
        let stagnation_threshold = NonZeroUsize::new(self.max_stagnation)
            .ok_or_else(|| invalid_config("evolution.max_stagnation must be at least 1"))?;
        Ok(PopulationConfig {
            size,
            distance_threshold: self.compatibility_threshold,
            elitism: self.elitism,
            survival_threshold: self.survival_threshold,
            adoption_rate: self.adoption_rate,
            sexual_reproduction_chance: self.crossover_chance,
            interspecies_mating_chance: self.interspecies_mating_chance,
            stagnation_threshold,
            stagnation_penalty: self.stagnation_penalty,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// A trial stops once the left paddle has more hits than this
    pub rally_cap: u32,
    /// Safety stop for trials that never reach another terminal state
    pub tick_limit: u64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            rally_cap: 50,
            tick_limit: 100_000,
        }
    }
}

impl Config {
    /// Read and validate a config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArenaError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ArenaError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml(&contents)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Read the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ArenaError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            log::info!("{} not found, using default config", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ArenaError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ArenaError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ArenaError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml()?)?;
        log::info!("wrote config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ArenaError> {
        let evolution = &self.evolution;
        if evolution.population_size < 2 {
            return invalid("evolution.population_size must be at least 2");
        }
        if evolution.generations == 0 {
            return invalid("evolution.generations must be at least 1");
        }
        if evolution.elitism > evolution.population_size {
            return invalid("evolution.elitism cannot exceed evolution.population_size");
        }
        if !(evolution.survival_threshold > 0.0 && evolution.survival_threshold <= 1.0) {
            return invalid("evolution.survival_threshold must be in (0, 1]");
        }
        if !evolution.compatibility_threshold.is_finite() || evolution.compatibility_threshold <= 0.0 {
            return invalid("evolution.compatibility_threshold must be positive");
        }
        if evolution.max_stagnation == 0 {
            return invalid("evolution.max_stagnation must be at least 1");
        }

        let genetics = &self.genetics;
        let chances = [
            ("evolution.adoption_rate", evolution.adoption_rate),
            ("evolution.crossover_chance", evolution.crossover_chance),
            ("evolution.interspecies_mating_chance", evolution.interspecies_mating_chance),
            ("evolution.stagnation_penalty", evolution.stagnation_penalty),
            ("genetics.initial_connection", genetics.initial_connection),
            ("genetics.weight_reset_chance", genetics.weight_reset_chance),
            ("genetics.weight_nudge_chance", genetics.weight_nudge_chance),
            ("genetics.node_add_chance", genetics.node_add_chance),
            ("genetics.gene_add_chance", genetics.gene_add_chance),
            ("genetics.node_delete_chance", genetics.node_delete_chance),
            ("genetics.gene_delete_chance", genetics.gene_delete_chance),
            ("genetics.recurrence_chance", genetics.recurrence_chance),
            ("genetics.child_mutation_chance", genetics.child_mutation_chance),
            ("genetics.mate_by_averaging_chance", genetics.mate_by_averaging_chance),
            ("genetics.suppression_reset_chance", genetics.suppression_reset_chance),
        ];
        for (name, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return invalid(&format!("{name} must be in [0, 1]"));
            }
        }
        if !genetics.weight_bound.is_finite() || genetics.weight_bound <= 0.0 {
            return invalid("genetics.weight_bound must be positive");
        }
        if !genetics.weight_mutation_power.is_finite() || genetics.weight_mutation_power < 0.0 {
            return invalid("genetics.weight_mutation_power must be a non-negative number");
        }
        if genetics.hidden_activations.is_empty() && genetics.node_add_chance > 0.0 {
            return invalid("genetics.hidden_activations cannot be empty while nodes can be added");
        }

        if self.trial.tick_limit == 0 {
            return invalid("trial.tick_limit must be at least 1");
        }
        Ok(())
    }
}

fn invalid_config(message: &str) -> ArenaError {
    ArenaError::InvalidConfig(message.to_string())
}

fn invalid(message: &str) -> Result<(), ArenaError> {
    Err(invalid_config(message))
}
