//! Evaluation counters and logging setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters shared by the evaluators. Safe to update from worker threads.
pub struct Metrics {
    generations: AtomicU64,
    evaluations: AtomicU64,
    failures: AtomicU64,
    winners: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generations: AtomicU64::new(0),
            evaluations: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            winners: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_evaluation(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a finished generation.
    pub fn record_generation(
        &self,
        generation: u32,
        evaluated: usize,
        winners: usize,
        best_fitness: f64,
        duration: Duration,
    ) {
        self.generations.fetch_add(1, Ordering::Relaxed);
        self.winners.fetch_add(winners as u64, Ordering::Relaxed);
        tracing::info!(
            generation,
            evaluated,
            winners,
            best_fitness,
            duration_ms = duration.as_millis() as u64,
            "Generation evaluated"
        );
    }

    #[must_use]
    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn winners(&self) -> u64 {
        self.winners.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` wins over `level` when
/// set. A second call leaves the first subscriber in place.
pub fn init_logging(level: tracing::Level) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}
