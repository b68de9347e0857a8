//! # Evonet
//!
//! Neuroevolution phenotype execution. The engine lives in `evonet_core` and
//! the genome data model in `evonet_data`; this crate adds the XOR demo task
//! driven by the `evonet` binary.

pub mod xor;

pub use evonet_core as core;
pub use evonet_data as data;
