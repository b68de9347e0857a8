pub mod macros;

use evonet_core::genome::create_genome_random_with_rng;
use evonet_data::{ActivationType, Genome, LinkGene, ModuleGene, NeuronType, NodeGene};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fluent construction of genomes for tests.
#[allow(dead_code)]
pub struct GenomeBuilder {
    genome: Genome,
}

#[allow(dead_code)]
impl GenomeBuilder {
    pub fn new(id: usize) -> Self {
        Self {
            genome: Genome::new(id),
        }
    }

    pub fn node(mut self, id: usize, neuron_type: NeuronType, activation: ActivationType) -> Self {
        self.genome.nodes.push(NodeGene {
            id,
            neuron_type,
            activation,
        });
        self
    }

    pub fn sensor(self, id: usize, neuron_type: NeuronType) -> Self {
        self.node(id, neuron_type, ActivationType::Null)
    }

    fn gene(mut self, from: usize, to: usize, weight: f64, recurrent: bool, time_delayed: bool) -> Self {
        let innovation = self.genome.next_innovation();
        self.genome.genes.push(LinkGene {
            from,
            to,
            weight,
            recurrent,
            time_delayed,
            innovation,
            enabled: true,
        });
        self
    }

    pub fn link(self, from: usize, to: usize, weight: f64) -> Self {
        self.gene(from, to, weight, false, false)
    }

    pub fn delayed_link(self, from: usize, to: usize, weight: f64) -> Self {
        self.gene(from, to, weight, true, true)
    }

    pub fn module(
        mut self,
        id: usize,
        activation: ActivationType,
        inputs: &[usize],
        outputs: &[usize],
    ) -> Self {
        self.genome.modules.push(ModuleGene {
            id,
            activation,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        });
        self
    }

    pub fn build(self) -> Genome {
        self.genome
    }
}

/// Three inputs wired straight to two outputs.
#[allow(dead_code)]
pub fn three_in_two_out() -> Genome {
    let mut b = GenomeBuilder::new(1);
    for id in 1..=3 {
        b = b.sensor(id, NeuronType::Input);
    }
    b = b
        .node(4, NeuronType::Output, ActivationType::SigmoidSteepened)
        .node(5, NeuronType::Output, ActivationType::Linear);
    for from in 1..=3 {
        b = b.link(from, 4, 0.3 * from as f64).link(from, 5, -0.2);
    }
    b.build()
}

/// Bias, two inputs, one recurrent hidden layer feeding one output.
#[allow(dead_code)]
pub fn recurrent_genome() -> Genome {
    GenomeBuilder::new(2)
        .sensor(1, NeuronType::Bias)
        .sensor(2, NeuronType::Input)
        .sensor(3, NeuronType::Input)
        .node(4, NeuronType::Output, ActivationType::Tanh)
        .node(5, NeuronType::Hidden, ActivationType::SigmoidBipolar)
        .node(6, NeuronType::Hidden, ActivationType::Linear)
        .link(1, 5, 0.4)
        .link(2, 5, -0.9)
        .link(3, 6, 0.7)
        .link(5, 6, 0.5)
        .link(6, 4, 1.2)
        .link(5, 4, -0.3)
        .delayed_link(4, 5, 0.8)
        .delayed_link(6, 6, -0.25)
        .build()
}

#[allow(dead_code)]
pub fn random_genome(seed: u64, inputs: usize, outputs: usize, hidden: usize) -> Genome {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    create_genome_random_with_rng(seed as usize + 1, inputs, outputs, hidden, 0.5, &mut rng)
}

/// Deterministic sensor values for `inputs` true inputs.
#[allow(dead_code)]
pub fn sensor_values(inputs: usize, step: usize) -> Vec<f64> {
    (0..inputs)
        .map(|i| ((i + 1) as f64 * 0.37 + step as f64 * 0.11).sin())
        .collect()
}
