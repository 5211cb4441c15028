//! NEAT genomes and the networks built from them.
//!
//! Genomes are `oxineat-nn` genomes with 3 sensors and 3 actuators plus
//! whatever hidden structure evolution has grown. This module only decides
//! how they are configured, checked and run as paddle brains.

use std::cell::RefCell;
use std::collections::HashSet;
use std::num::NonZeroUsize;

use oxineat_nn::genomics::{ActivationType, GeneticConfig, NNGenome, NodeType};
use oxineat_nn::networks::FunctionApproximatorNetwork;
use serde::{Deserialize, Serialize};

use crate::decision::DecisionFn;
use crate::error::BrainError;

pub const NUM_INPUTS: usize = 3;
pub const NUM_OUTPUTS: usize = 3;

/// Recurrent loops are followed at most this many times per activation
const MAX_NODE_VISITS: u8 = 1;

const SENSORS: NonZeroUsize = match NonZeroUsize::new(NUM_INPUTS) {
    Some(n) => n,
    None => panic!("paddle brains need inputs"),
};
const ACTUATORS: NonZeroUsize = match NonZeroUsize::new(NUM_OUTPUTS) {
    Some(n) => n,
    None => panic!("paddle brains need outputs"),
};

/// The evolvable encoding of a paddle brain
pub type Genome = NNGenome;

/// Node activation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Sigmoid,
    Identity,
    Relu,
    Gaussian,
    Sine,
}

impl From<Activation> for ActivationType {
    fn from(activation: Activation) -> Self {
        match activation {
            Activation::Sigmoid => ActivationType::Sigmoid,
            Activation::Identity => ActivationType::Identity,
            Activation::Relu => ActivationType::ReLU,
            Activation::Gaussian => ActivationType::Gaussian,
            Activation::Sine => ActivationType::Sinusoidal,
        }
    }
}

/// Genome structure and the genetic operators applied to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticsConfig {
    /// Activations available to hidden nodes added by mutation
    pub hidden_activations: Vec<Activation>,
    pub output_activation: Activation,
    /// Probability that each sensor/actuator pair starts connected
    pub initial_connection: f32,
    /// Weights stay strictly inside [-weight_bound, weight_bound]
    pub weight_bound: f32,
    pub weight_reset_chance: f32,
    pub weight_nudge_chance: f32,
    pub weight_mutation_power: f32,
    pub node_add_chance: f32,
    pub gene_add_chance: f32,
    pub node_delete_chance: f32,
    pub gene_delete_chance: f32,
    pub max_gene_add_attempts: usize,
    /// Zero keeps every network feedforward
    pub recurrence_chance: f32,
    pub child_mutation_chance: f32,
    pub mate_by_averaging_chance: f32,
    pub suppression_reset_chance: f32,
    pub excess_coefficient: f32,
    pub disjoint_coefficient: f32,
    pub weight_coefficient: f32,
}

impl Default for GeneticsConfig {
    fn default() -> Self {
        Self {
            hidden_activations: vec![Activation::Sigmoid],
            output_activation: Activation::Sigmoid,
            initial_connection: 1.0,
            weight_bound: 30.0,
            weight_reset_chance: 0.1,
            weight_nudge_chance: 0.8,
            weight_mutation_power: 0.5,
            node_add_chance: 0.2,
            gene_add_chance: 0.5,
            node_delete_chance: 0.0,
            gene_delete_chance: 0.0,
            max_gene_add_attempts: 20,
            recurrence_chance: 0.0,
            child_mutation_chance: 0.8,
            mate_by_averaging_chance: 0.4,
            suppression_reset_chance: 0.25,
            excess_coefficient: 1.0,
            disjoint_coefficient: 1.0,
            weight_coefficient: 0.5,
        }
    }
}

impl GeneticsConfig {
    /// The `oxineat-nn` settings for 3-in/3-out paddle genomes
    pub fn to_genetic_config(&self) -> GeneticConfig {
        GeneticConfig {
            input_count: SENSORS,
            output_count: ACTUATORS,
            activation_types: self
                .hidden_activations
                .iter()
                .map(|a| ActivationType::from(*a))
                .collect(),
            output_activation_types: vec![self.output_activation.into(); NUM_OUTPUTS],
            child_mutation_chance: self.child_mutation_chance,
            mate_by_averaging_chance: self.mate_by_averaging_chance,
            suppression_reset_chance: self.suppression_reset_chance,
            initial_expression_chance: self.initial_connection,
            weight_bound: self.weight_bound,
            weight_reset_chance: self.weight_reset_chance,
            weight_nudge_chance: self.weight_nudge_chance,
            weight_mutation_power: self.weight_mutation_power,
            node_addition_mutation_chance: self.node_add_chance,
            gene_addition_mutation_chance: self.gene_add_chance,
            node_deletion_mutation_chance: self.node_delete_chance,
            gene_deletion_mutation_chance: self.gene_delete_chance,
            max_gene_addition_mutation_attempts: self.max_gene_add_attempts,
            recursion_chance: self.recurrence_chance,
            excess_gene_factor: self.excess_coefficient,
            disjoint_gene_factor: self.disjoint_coefficient,
            common_weight_factor: self.weight_coefficient,
        }
    }
}

/// Check a genome describes a usable 3-in/3-out network
pub fn validate(genome: &Genome) -> Result<(), BrainError> {
    let count = |kind: NodeType| genome.nodes().filter(|n| n.node_type() == kind).count();
    let inputs = count(NodeType::Sensor);
    if inputs != NUM_INPUTS {
        return Err(BrainError::InputCount {
            expected: NUM_INPUTS,
            found: inputs,
        });
    }
    let outputs = count(NodeType::Actuator);
    if outputs != NUM_OUTPUTS {
        return Err(BrainError::OutputCount {
            expected: NUM_OUTPUTS,
            found: outputs,
        });
    }

    let nodes: HashSet<_> = genome.nodes().map(|n| n.innovation()).collect();
    for gene in genome.genes() {
        if !nodes.contains(&gene.input()) || !nodes.contains(&gene.output()) {
            return Err(BrainError::DanglingGene {
                gene: gene.innovation(),
            });
        }
        if !gene.weight().is_finite() {
            return Err(BrainError::NonFinite {
                gene: gene.innovation(),
            });
        }
    }
    Ok(())
}

/// Network built from a validated genome
pub struct Network {
    inner: RefCell<FunctionApproximatorNetwork>,
}

impl Network {
    /// Build the phenotype; a malformed genome is a configuration error
    pub fn from_genome(genome: &Genome) -> Result<Self, BrainError> {
        validate(genome)?;
        Ok(Self {
            inner: RefCell::new(FunctionApproximatorNetwork::from::<MAX_NODE_VISITS>(genome)),
        })
    }
}

impl DecisionFn for Network {
    fn activate(&self, inputs: &[f32; 3]) -> [f32; 3] {
        let outputs = self.inner.borrow_mut().evaluate_at(inputs);
        let mut scores = [0.0; NUM_OUTPUTS];
        for (score, value) in scores.iter_mut().zip(outputs) {
            *score = value;
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Actuators copy their sensor straight through
    fn passthrough() -> Genome {
        let config = GeneticsConfig {
            output_activation: Activation::Identity,
            initial_connection: 0.0,
            ..GeneticsConfig::default()
        };
        let mut genome = Genome::new(&config.to_genetic_config());
        for i in 0..NUM_INPUTS {
            genome.add_gene(i, i, NUM_INPUTS + i, 1.0).unwrap();
        }
        genome
    }

    #[test]
    fn test_new_genome_is_fully_connected() {
        let config = GeneticsConfig::default();
        let genome = Genome::new(&config.to_genetic_config());

        assert_eq!(genome.nodes().count(), NUM_INPUTS + NUM_OUTPUTS);
        assert_eq!(genome.genes().count(), NUM_INPUTS * NUM_OUTPUTS);
        assert!(genome
            .genes()
            .all(|g| g.weight().abs() <= config.weight_bound));
        assert!(validate(&genome).is_ok());
    }

    #[test]
    fn test_forward_pass() {
        let net = Network::from_genome(&passthrough()).unwrap();
        assert_eq!(net.activate(&[1.0, -2.0, 3.5]), [1.0, -2.0, 3.5]);
        // No state carries over between activations
        assert_eq!(net.activate(&[0.0, 4.0, 0.5]), [0.0, 4.0, 0.5]);
    }

    #[test]
    fn test_unconnected_genome_outputs_nothing() {
        let config = GeneticsConfig {
            initial_connection: 0.0,
            ..GeneticsConfig::default()
        };
        let genome = Genome::new(&config.to_genetic_config());
        let net = Network::from_genome(&genome).unwrap();
        assert_eq!(net.activate(&[10.0, 20.0, 30.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sigmoid_outputs_are_squashed() {
        let genome = Genome::new(&GeneticsConfig::default().to_genetic_config());
        let net = Network::from_genome(&genome).unwrap();
        let outputs = net.activate(&[120.0, 300.0, 45.0]);
        assert!(outputs.iter().all(|o| (0.0..=1.0).contains(o)));
    }

    #[test]
    fn test_wrong_shapes_are_rejected() {
        let two_in = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            ..GeneticsConfig::default().to_genetic_config()
        };
        assert!(matches!(
            Network::from_genome(&Genome::new(&two_in)),
            Err(BrainError::InputCount { found: 2, .. })
        ));

        let one_out = GeneticConfig {
            output_count: NonZeroUsize::new(1).unwrap(),
            ..GeneticsConfig::default().to_genetic_config()
        };
        assert!(matches!(
            Network::from_genome(&Genome::new(&one_out)),
            Err(BrainError::OutputCount { found: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_weight_is_rejected() {
        let mut genome = passthrough();
        genome.add_gene(10, 0, 4, f32::NAN).unwrap();
        assert!(matches!(
            validate(&genome),
            Err(BrainError::NonFinite { gene: 10 })
        ));
    }

    #[test]
    fn test_genetic_config_is_fixed_to_paddle_shape() {
        let config = GeneticsConfig {
            hidden_activations: vec![Activation::Relu, Activation::Sine],
            output_activation: Activation::Gaussian,
            ..GeneticsConfig::default()
        };
        let genetic = config.to_genetic_config();

        assert_eq!(genetic.input_count.get(), 3);
        assert_eq!(genetic.output_count.get(), 3);
        assert_eq!(
            genetic.activation_types,
            vec![ActivationType::ReLU, ActivationType::Sinusoidal]
        );
        assert_eq!(
            genetic.output_activation_types,
            vec![ActivationType::Gaussian; 3]
        );
        assert_eq!(genetic.initial_expression_chance, 1.0);
    }
}
