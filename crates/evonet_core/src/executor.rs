//! Population evaluation strategies.
//!
//! Both evaluators run a user fitness function over every organism of a
//! generation and mark winners against
//! [`EvaluationConfig::solved_fitness`]. The sequential strategy works on the
//! organisms in place. The parallel strategy hands each worker its own copy
//! decoded from the wire format and reads the result back as text, so no
//! organism or network is ever shared between threads.

use crate::config::EvaluationConfig;
use crate::error::{NetError, Result};
use crate::genome::Encoding;
use crate::metrics::Metrics;
use crate::organism::Organism;
use crate::solver::Solver;
use std::sync::Arc;
use std::time::Instant;

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    pub evaluated: usize,
    /// Highest fitness seen; negative infinity for an empty population.
    pub best_fitness: f64,
    pub winners: usize,
}

/// Runs a fitness function over a generation.
///
/// Implementations are interchangeable as far as `fitness`, `error` and
/// `is_winner` go. Anything else the fitness function writes (the user
/// payload, bookkeeping flags) only survives the sequential strategy.
pub trait PopulationEvaluator<G: Encoding, D = ()> {
    /// Evaluates every organism, stopping at the first failure.
    fn evaluate<F>(
        &self,
        population: &mut [Organism<G, D>],
        generation: u32,
        fitness: &F,
    ) -> Result<EpochStats>
    where
        F: Fn(&mut Organism<G, D>) -> Result<()> + Sync;
}

/// Feeds every sample through a solver and collects its outputs.
///
/// Each sample is loaded, activated `steps` times with a budget of
/// `max_steps` per activation, read, and flushed.
pub fn run_samples<S: Solver>(
    solver: &mut S,
    samples: &[Vec<f64>],
    steps: usize,
    max_steps: usize,
) -> Result<Vec<Vec<f64>>> {
    let mut outputs = Vec::with_capacity(samples.len());
    for sample in samples {
        solver.load_sensors(sample)?;
        for _ in 0..steps.max(1) {
            solver.activate_steps(max_steps)?;
        }
        outputs.push(solver.read_outputs());
        solver.flush()?;
    }
    Ok(outputs)
}

/// Runs samples through an organism's phenotype, relaxing for as many steps
/// as the network is deep. Uses a freshly compiled solver when the config
/// asks for one.
pub fn activate_samples<G: Encoding, D>(
    organism: &mut Organism<G, D>,
    samples: &[Vec<f64>],
    config: &EvaluationConfig,
) -> Result<Vec<Vec<f64>>> {
    let depth = match organism.phenotype.max_depth_with_limit(config.max_depth_limit) {
        Ok(depth) => depth,
        Err(NetError::UnsupportedForModular(_)) => 1,
        Err(e) => return Err(e),
    };
    if config.use_compiled_solver {
        let mut solver = organism.phenotype.compile()?;
        run_samples(&mut solver, samples, depth, config.max_activation_steps)
    } else {
        run_samples(
            &mut organism.phenotype,
            samples,
            depth,
            config.max_activation_steps,
        )
    }
}

/// Overrides the fitness function's verdict when a solved threshold is set.
fn mark_winner<G: Encoding, D>(config: &EvaluationConfig, organism: &mut Organism<G, D>) {
    if let Some(solved) = config.solved_fitness {
        organism.is_winner = organism.fitness >= solved;
    }
}

fn summarize<G: Encoding, D>(population: &[Organism<G, D>]) -> EpochStats {
    EpochStats {
        evaluated: population.len(),
        best_fitness: population
            .iter()
            .map(|o| o.fitness)
            .fold(f64::NEG_INFINITY, f64::max),
        winners: population.iter().filter(|o| o.is_winner).count(),
    }
}

/// Evaluates organisms one after another on the calling thread.
pub struct SequentialEvaluator {
    config: EvaluationConfig,
    metrics: Arc<Metrics>,
}

impl SequentialEvaluator {
    #[must_use]
    pub fn new(config: EvaluationConfig, metrics: Arc<Metrics>) -> Self {
        Self { config, metrics }
    }
}

impl<G: Encoding, D> PopulationEvaluator<G, D> for SequentialEvaluator {
    fn evaluate<F>(
        &self,
        population: &mut [Organism<G, D>],
        generation: u32,
        fitness: &F,
    ) -> Result<EpochStats>
    where
        F: Fn(&mut Organism<G, D>) -> Result<()> + Sync,
    {
        let start = Instant::now();
        for organism in population.iter_mut() {
            if let Err(e) = fitness(organism) {
                self.metrics.record_failure();
                tracing::warn!(generation, genome = organism.genotype.id(), error = %e, "Evaluation failed");
                return Err(e);
            }
            self.metrics.record_evaluation();
            mark_winner(&self.config, organism);
        }
        let stats = summarize(population);
        self.metrics.record_generation(
            generation,
            stats.evaluated,
            stats.winners,
            stats.best_fitness,
            start.elapsed(),
        );
        Ok(stats)
    }
}

/// Evaluates organisms on rayon workers, exchanging them in wire format.
#[cfg(feature = "rayon")]
pub struct ParallelEvaluator {
    config: EvaluationConfig,
    metrics: Arc<Metrics>,
    pool: Option<rayon::ThreadPool>,
}

#[cfg(feature = "rayon")]
impl ParallelEvaluator {
    /// Builds a dedicated pool when `config.workers` is non-zero.
    pub fn new(config: EvaluationConfig, metrics: Arc<Metrics>) -> anyhow::Result<Self> {
        let pool = if config.workers > 0 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self {
            config,
            metrics,
            pool,
        })
    }

    fn evaluate_wire<G: Encoding, D, F>(&self, payloads: Vec<Vec<u8>>, fitness: &F) -> Result<Vec<Vec<u8>>>
    where
        F: Fn(&mut Organism<G, D>) -> Result<()> + Sync,
    {
        use rayon::prelude::*;

        let metrics = &self.metrics;
        payloads
            .into_par_iter()
            .map(|bytes| {
                let mut organism = Organism::<G, D>::from_bytes(&bytes)?;
                let result = fitness(&mut organism).and_then(|()| write_result(&organism));
                match &result {
                    Ok(_) => metrics.record_evaluation(),
                    Err(e) => {
                        metrics.record_failure();
                        tracing::warn!(genome = organism.genotype.id(), error = %e, "Worker evaluation failed");
                    }
                }
                result
            })
            .collect()
    }
}

#[cfg(feature = "rayon")]
impl<G: Encoding, D> PopulationEvaluator<G, D> for ParallelEvaluator {
    fn evaluate<F>(
        &self,
        population: &mut [Organism<G, D>],
        generation: u32,
        fitness: &F,
    ) -> Result<EpochStats>
    where
        F: Fn(&mut Organism<G, D>) -> Result<()> + Sync,
    {
        let start = Instant::now();
        let payloads = population
            .iter()
            .map(Organism::to_bytes)
            .collect::<Result<Vec<_>>>()?;

        let results = match &self.pool {
            Some(pool) => pool.install(|| self.evaluate_wire::<G, D, F>(payloads, fitness)),
            None => self.evaluate_wire::<G, D, F>(payloads, fitness),
        }?;

        for (organism, bytes) in population.iter_mut().zip(results) {
            let result = read_result(&bytes)?;
            if result.id != organism.genotype.id() {
                return Err(NetError::malformed(format!(
                    "worker returned genome {} for genome {}",
                    result.id,
                    organism.genotype.id()
                )));
            }
            organism.fitness = result.fitness;
            organism.error = result.error;
            organism.is_winner = result.is_winner;
            mark_winner(&self.config, organism);
        }

        let stats = summarize(population);
        self.metrics.record_generation(
            generation,
            stats.evaluated,
            stats.winners,
            stats.best_fitness,
            start.elapsed(),
        );
        Ok(stats)
    }
}

/// What a worker reports back for one organism.
#[cfg(feature = "rayon")]
#[derive(Debug, PartialEq)]
struct WorkerResult {
    fitness: f64,
    error: f64,
    is_winner: bool,
    id: usize,
}

/// Encodes an evaluated organism as `<error> <is_winner>` followed by its
/// wire record.
#[cfg(feature = "rayon")]
fn write_result<G: Encoding, D>(organism: &Organism<G, D>) -> Result<Vec<u8>> {
    use std::io::Write;

    let mut out = Vec::new();
    writeln!(out, "{} {}", organism.error, organism.is_winner)?;
    organism.write_to(&mut out)?;
    Ok(out)
}

#[cfg(feature = "rayon")]
fn read_result(bytes: &[u8]) -> Result<WorkerResult> {
    use std::io::BufRead;

    let mut reader = bytes;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let (error, is_winner): (f64, bool) = match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        [error, winner] => (
            error
                .parse()
                .map_err(|_| NetError::malformed(format!("bad error {error:?}")))?,
            winner
                .parse()
                .map_err(|_| NetError::malformed(format!("bad winner flag {winner:?}")))?,
        ),
        _ => {
            return Err(NetError::malformed(format!(
                "worker result needs 2 fields, got {:?}",
                line.trim_end()
            )))
        }
    };
    line.clear();
    reader.read_line(&mut line)?;
    let (fitness, _, id) = crate::organism::parse_header(&line)?;
    Ok(WorkerResult {
        fitness,
        error,
        is_winner,
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::create_genome_random_with_rng;
    use evonet_data::Genome;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn population(n: usize) -> Vec<Organism<Genome>> {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        (0..n)
            .map(|id| {
                let g = create_genome_random_with_rng(id + 1, 2, 1, 2, 0.6, &mut rng);
                Organism::new(0.0, g, 1).unwrap()
            })
            .collect()
    }

    fn samples() -> Vec<Vec<f64>> {
        vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]]
    }

    fn sum_of_outputs(org: &mut Organism<Genome>) -> Result<()> {
        let outputs = activate_samples(org, &samples(), &EvaluationConfig::default())?;
        org.fitness = outputs.iter().map(|o| o[0]).sum();
        Ok(())
    }

    #[test]
    fn test_run_samples_flushes_between_samples() {
        let mut pop = population(1);
        let config = EvaluationConfig::default();
        let first = activate_samples(&mut pop[0], &samples(), &config).unwrap();
        let second = activate_samples(&mut pop[0], &samples(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compiled_and_graph_samples_agree() {
        let mut pop = population(3);
        let graph = EvaluationConfig::default();
        let compiled = EvaluationConfig {
            use_compiled_solver: true,
            ..Default::default()
        };
        for org in &mut pop {
            let a = activate_samples(org, &samples(), &graph).unwrap();
            let b = activate_samples(org, &samples(), &compiled).unwrap();
            for (x, y) in a.iter().flatten().zip(b.iter().flatten()) {
                assert!((x - y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_sequential_marks_winners() {
        let config = EvaluationConfig {
            solved_fitness: Some(f64::NEG_INFINITY),
            ..Default::default()
        };
        let metrics = Arc::new(Metrics::new());
        let evaluator = SequentialEvaluator::new(config, metrics.clone());
        let mut pop = population(4);
        let stats = evaluator.evaluate(&mut pop, 1, &sum_of_outputs).unwrap();
        assert_eq!(stats.evaluated, 4);
        assert_eq!(stats.winners, 4);
        assert_eq!(metrics.evaluations(), 4);
        assert_eq!(metrics.generations(), 1);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_matches_sequential() {
        let metrics = Arc::new(Metrics::new());
        let sequential = SequentialEvaluator::new(EvaluationConfig::default(), metrics.clone());
        let parallel = ParallelEvaluator::new(
            EvaluationConfig {
                workers: 2,
                ..Default::default()
            },
            metrics,
        )
        .unwrap();

        let mut a = population(6);
        let mut b = population(6);
        let sa = sequential.evaluate(&mut a, 1, &sum_of_outputs).unwrap();
        let sb = parallel.evaluate(&mut b, 1, &sum_of_outputs).unwrap();
        assert_eq!(sa, sb);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.fitness, y.fitness);
            assert_eq!(x.error, y.error);
            assert_eq!(x.is_winner, y.is_winner);
        }
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_worker_result_carries_error_and_verdict() {
        let mut org = population(1).remove(0);
        org.fitness = 2.5;
        org.error = 0.125;
        org.is_winner = true;
        let bytes = write_result(&org).unwrap();
        assert_eq!(
            read_result(&bytes).unwrap(),
            WorkerResult {
                fitness: 2.5,
                error: 0.125,
                is_winner: true,
                id: 1,
            }
        );
        assert!(read_result(b"0.5\n1 0 1\n").is_err());
    }

    #[test]
    fn test_failure_is_returned() {
        let evaluator = SequentialEvaluator::new(EvaluationConfig::default(), Arc::new(Metrics::new()));
        let mut pop = population(2);
        let fail = |_: &mut Organism<Genome>| -> Result<()> { Err(NetError::NotImplemented("fitness")) };
        assert!(evaluator.evaluate(&mut pop, 0, &fail).is_err());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_failure_is_returned() {
        let mut pop = population(2);
        let fail = |_: &mut Organism<Genome>| -> Result<()> { Err(NetError::NotImplemented("fitness")) };
        let parallel = ParallelEvaluator::new(EvaluationConfig::default(), Arc::new(Metrics::new())).unwrap();
        assert!(matches!(
            parallel.evaluate(&mut pop, 0, &fail),
            Err(NetError::NotImplemented("fitness"))
        ));
    }
}
