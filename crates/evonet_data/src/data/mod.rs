//! Core data structures for evolved phenotypes.

pub mod genome;
pub mod neuron;
