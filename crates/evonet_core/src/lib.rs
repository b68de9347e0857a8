//! # Evonet Core
//!
//! Phenotype execution for neuroevolution: the networks a genome expresses,
//! the engine that propagates signals through them, and the organisms that
//! carry them through an evolutionary epoch.
//!
//! This crate contains:
//! - Phenotype networks stored as an index-addressed node table
//! - The step-wise activation engine with time-delayed links and control modules
//! - A compiled, index-only solver with the same evaluation semantics
//! - Organisms with selection ordering and a plain-text wire format
//! - Sequential and rayon-powered population evaluators
//! - Configuration, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use evonet_core::genome::{create_genome_random_with_rng, Encoding};
//! use evonet_core::solver::Solver;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let genome = create_genome_random_with_rng(1, 2, 1, 3, 0.5, &mut rng);
//!
//! let mut net = genome.genesis(1).unwrap();
//! net.load_sensors(&[0.5, 1.0]).unwrap();
//! net.activate().unwrap();
//! let outputs = net.read_outputs();
//! assert_eq!(outputs.len(), 1);
//! ```

/// Activation functions for neurons and modules
pub mod activation;
/// Evaluation parameters loaded from TOML
pub mod config;
/// Error types and their coarse classification
pub mod error;
/// Population evaluation strategies
pub mod executor;
/// Genetic encoding contract and the reference genome
pub mod genome;
/// Evaluation counters and logging setup
pub mod metrics;
/// Phenotype graph and activation engine
pub mod network;
/// Organisms and their wire format
pub mod organism;
/// Solver contract and the compiled solver
pub mod solver;

pub use activation::ActivationLogic;
pub use config::EvaluationConfig;
pub use error::{ErrorKind, NetError, Result};
pub use executor::{EpochStats, PopulationEvaluator, SequentialEvaluator};
#[cfg(feature = "rayon")]
pub use executor::ParallelEvaluator;
pub use genome::Encoding;
pub use metrics::{init_logging, Metrics};
pub use network::{Link, Network, NetworkBuilder, Node, NodeKind};
pub use organism::{sort_organisms, Organism, SpeciesId};
pub use solver::{CompiledSolver, Solver};
pub use evonet_data::{ActivationType, Genome, NeuronType};
