//! XOR benchmark task: two inputs, one output.

use evonet_core::executor::activate_samples;
use evonet_core::genome::create_genome_random_with_rng;
use evonet_core::{EvaluationConfig, Organism, Result};
use evonet_data::Genome;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fitness of an organism whose outputs match every target exactly.
pub const MAX_FITNESS: f64 = 16.0;

const TARGETS: [f64; 4] = [0.0, 1.0, 1.0, 0.0];

#[must_use]
pub fn samples() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ]
}

/// Scores an organism on the four XOR cases.
///
/// Fitness is `(4 - total error)^2`. The organism wins when every output lands
/// on the correct side of 0.5.
pub fn evaluate<D>(
    organism: &mut Organism<Genome, D>,
    config: &EvaluationConfig,
) -> Result<Vec<f64>> {
    let outputs: Vec<f64> = activate_samples(organism, &samples(), config)?
        .into_iter()
        .map(|o| o.first().copied().unwrap_or_default())
        .collect();
    let error: f64 = outputs
        .iter()
        .zip(TARGETS)
        .map(|(out, target)| (out - target).abs())
        .sum();
    organism.error = error;
    organism.fitness = (4.0 - error).powi(2);
    organism.is_winner = outputs
        .iter()
        .zip(TARGETS)
        .all(|(&out, target)| (out >= 0.5) == (target >= 0.5));
    Ok(outputs)
}

/// Seeded population of random two-input, one-output organisms.
pub fn random_population(
    size: usize,
    hidden: usize,
    seed: u64,
    generation: u32,
) -> Result<Vec<Organism<Genome>>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..size)
        .map(|i| {
            let genome = create_genome_random_with_rng(i + 1, 2, 1, hidden, 0.5, &mut rng);
            Organism::new(0.0, genome, generation)
        })
        .collect()
}
