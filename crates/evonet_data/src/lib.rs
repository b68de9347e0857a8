//! Plain data records shared by the evonet crates.
//!
//! Nothing in here knows how to activate a network. The logic lives in
//! `evonet_core`, which implements its traits over these types.

pub mod data;

pub use data::genome::{Genome, LinkGene, ModuleGene, NodeGene};
pub use data::neuron::{ActivationType, NeuronType};
