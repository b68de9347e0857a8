//! Evaluation parameters.
//!
//! The configuration is an immutable value handed to evaluators and network
//! helpers. It is usually loaded from a TOML file; missing keys fall back to
//! their defaults.
//!
//! ## Example `evonet.toml`
//!
//! ```toml
//! max_activation_steps = 20
//! max_depth_limit = 100
//! workers = 0
//! use_compiled_solver = true
//! solved_fitness = 15.5
//! log_level = "info"
//! ```

use crate::network::topology::DEFAULT_MAX_DEPTH;
use crate::network::DEFAULT_ACTIVATION_STEPS;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Step budget for one activation.
    pub max_activation_steps: usize,
    pub max_depth_limit: usize,
    /// Parallel evaluation threads; 0 uses the global rayon pool.
    pub workers: usize,
    /// Evaluate through a compiled solver instead of the graph.
    pub use_compiled_solver: bool,
    /// Fitness at or above which an organism is marked as a winner.
    pub solved_fitness: Option<f64>,
    pub log_level: String,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            max_activation_steps: DEFAULT_ACTIVATION_STEPS,
            max_depth_limit: DEFAULT_MAX_DEPTH,
            workers: 0,
            use_compiled_solver: false,
            solved_fitness: None,
            log_level: "info".to_string(),
        }
    }
}

impl EvaluationConfig {
    /// Validates all parameters, reporting the first failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.max_activation_steps > 0,
            "Max activation steps must be positive"
        );
        anyhow::ensure!(self.max_depth_limit > 0, "Max depth limit must be positive");
        anyhow::ensure!(self.workers <= 1024, "Too many workers (max 1024)");
        if let Some(solved) = self.solved_fitness {
            anyhow::ensure!(!solved.is_nan(), "Solved fitness must be a number");
        }
        anyhow::ensure!(
            self.log_level.parse::<tracing::Level>().is_ok(),
            "Unknown log level: {}",
            self.log_level
        );
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Default level for [`crate::metrics::init_logging`]; falls back to
    /// INFO for an unparsable level.
    #[must_use]
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }

    /// Digest identifying the parameters that affect evaluation results.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.max_activation_steps.to_le_bytes());
        hasher.update(self.max_depth_limit.to_le_bytes());
        hasher.update([u8::from(self.use_compiled_solver)]);
        hasher.update(format!("{:?}", self.solved_fitness).as_bytes());
        hex::encode(hasher.finalize())
    }
}
