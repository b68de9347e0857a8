//! Genetic encodings and the phenotypes they express.

pub mod codec;
pub mod random;

pub use codec::{read_genome, write_genome};
pub use random::create_genome_random_with_rng;

use crate::error::Result;
use crate::network::{Network, NetworkBuilder};
use evonet_data::{Genome, NeuronType};
use std::io::{BufRead, Write};

/// Contract between organisms and their genetic encoding.
pub trait Encoding: Clone + Send + Sized {
    fn id(&self) -> usize;

    /// Expresses the encoding as an executable network with id `net_id`.
    fn genesis(&self, net_id: usize) -> Result<Network>;

    fn write_to<W: Write>(&self, w: &mut W) -> Result<()>;

    /// Reads an encoding previously written by [`Encoding::write_to`],
    /// failing when its recorded id is not `id`.
    fn read_from<R: BufRead>(r: &mut R, id: usize) -> Result<Self>;
}

impl Encoding for Genome {
    fn id(&self) -> usize {
        self.id
    }

    fn genesis(&self, net_id: usize) -> Result<Network> {
        let mut builder = NetworkBuilder::new(net_id).name(format!("genome-{}", self.id));
        for node in &self.nodes {
            builder.add_node(node.id, node.neuron_type, node.activation)?;
        }
        for module in &self.modules {
            builder.add_node(module.id, NeuronType::Control, module.activation)?;
        }
        for gene in self.genes.iter().filter(|g| g.enabled) {
            builder.connect(gene.from, gene.to, gene.weight, gene.recurrent, gene.time_delayed)?;
        }
        for module in &self.modules {
            for &input in &module.inputs {
                builder.connect(input, module.id, 1.0, false, false)?;
            }
            for &output in &module.outputs {
                builder.connect(module.id, output, 1.0, false, false)?;
            }
        }
        builder.build()
    }

    fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_genome(self, w)
    }

    fn read_from<R: BufRead>(r: &mut R, id: usize) -> Result<Self> {
        codec::read_genome(r, id)
    }
}
