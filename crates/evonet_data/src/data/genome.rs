use super::neuron::{ActivationType, NeuronType};
use serde::{Deserialize, Serialize};

/// A node gene: one neuron of the phenotype.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NodeGene {
    /// Unique node identifier within the genome.
    pub id: usize,
    /// Category of the neuron.
    pub neuron_type: NeuronType,
    /// Function applied to the incoming sum.
    pub activation: ActivationType,
}

/// A link gene: one weighted connection of the phenotype.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinkGene {
    /// Source node ID.
    pub from: usize,
    /// Target node ID.
    pub to: usize,
    /// Connection weight.
    pub weight: f64,
    /// Whether the link closes a cycle in the forward flow.
    pub recurrent: bool,
    /// Whether the link reads the source's previous-step output.
    pub time_delayed: bool,
    /// Innovation number for NEAT crossover.
    pub innovation: usize,
    /// Disabled genes are carried but not expressed.
    pub enabled: bool,
}

/// A module gene: a control node mapping several nodes onto others.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ModuleGene {
    /// Control node identifier, disjoint from node gene ids.
    pub id: usize,
    /// Module function (one of the `Module*` activation types).
    pub activation: ActivationType,
    /// Node ids read by the module, in order.
    pub inputs: Vec<usize>,
    /// Node ids written by the module, in order.
    pub outputs: Vec<usize>,
}

/// Reference genetic encoding of a phenotype.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Genome {
    /// Genome identifier; lower ids were created earlier.
    pub id: usize,
    pub nodes: Vec<NodeGene>,
    pub genes: Vec<LinkGene>,
    #[serde(default)]
    pub modules: Vec<ModuleGene>,
}

impl Genome {
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Next free innovation number.
    #[must_use]
    pub fn next_innovation(&self) -> usize {
        self.genes.iter().map(|g| g.innovation + 1).max().unwrap_or(1)
    }
}
