//! Hybrid metaheuristic configuration.
//!
//! [`HybridConfig`] holds every hyperparameter of the evolutionary loop. It
//! persists across runs; `free()` on the algorithm never touches it.

use serde::{Deserialize, Serialize};

use crate::error::EvrpError;

/// Configuration for the hybrid genetic search.
///
/// # Defaults
///
/// ```
/// use evrp_search::ga::HybridConfig;
///
/// let config = HybridConfig::default();
/// assert_eq!(config.population_size, 200);
/// assert_eq!(config.generations, 150);
/// assert_eq!(config.elite_size, 20);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use evrp_search::ga::HybridConfig;
///
/// let config = HybridConfig::default()
///     .with_population_size(50)
///     .with_generations(40)
///     .with_crossover_prob(0.8)
///     .with_mutation_prob(0.2)
///     .with_seed(7);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    /// Number of giant tours per generation.
    pub population_size: usize,

    /// Number of generations to evolve.
    pub generations: usize,

    /// Probability of applying OX crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, parent 1 is cloned.
    pub crossover_prob: f64,

    /// Probability of mutating an offspring (0.0–1.0).
    pub mutation_prob: f64,

    /// Individuals carried unchanged into the next generation; at least one.
    pub elite_size: usize,

    /// Individuals drawn per tournament.
    pub tournament_size: usize,

    /// Multiplier on violation magnitude when computing fitness.
    pub penalty_weight: f64,

    /// Whether decoded routes are improved with 2-opt.
    pub local_search: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a fresh seed for every run.
    pub seed: Option<u64>,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            generations: 150,
            crossover_prob: 0.0,
            mutation_prob: 1.0,
            elite_size: 20,
            tournament_size: 3,
            penalty_weight: 1000.0,
            local_search: true,
            seed: None,
        }
    }
}

impl HybridConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover probability, clamped to `[0, 1]`.
    pub fn with_crossover_prob(mut self, p: f64) -> Self {
        self.crossover_prob = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability, clamped to `[0, 1]`.
    pub fn with_mutation_prob(mut self, p: f64) -> Self {
        self.mutation_prob = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_elite_size(mut self, n: usize) -> Self {
        self.elite_size = n;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_penalty_weight(mut self, w: f64) -> Self {
        self.penalty_weight = w;
        self
    }

    pub fn with_local_search(mut self, enabled: bool) -> Self {
        self.local_search = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the hyperparameters describe a runnable search.
    pub fn validate(&self) -> Result<(), EvrpError> {
        if self.population_size < 2 {
            return Err(EvrpError::InvalidConfig(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.generations == 0 {
            return Err(EvrpError::InvalidConfig(
                "generations must be at least 1".into(),
            ));
        }
        if self.elite_size == 0 {
            return Err(EvrpError::InvalidConfig(
                "elite_size must be at least 1".into(),
            ));
        }
        if self.elite_size >= self.population_size {
            return Err(EvrpError::InvalidConfig(format!(
                "elite_size ({}) must be below population_size ({})",
                self.elite_size, self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(EvrpError::InvalidConfig(
                "tournament_size must be at least 1".into(),
            ));
        }
        for (name, p) in [
            ("crossover_prob", self.crossover_prob),
            ("mutation_prob", self.mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EvrpError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {p}"
                )));
            }
        }
        if !self.penalty_weight.is_finite() || self.penalty_weight < 0.0 {
            return Err(EvrpError::InvalidConfig(format!(
                "penalty_weight must be finite and non-negative, got {}",
                self.penalty_weight
            )));
        }
        Ok(())
    }
}
