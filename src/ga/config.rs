//! NSGA-II configuration.
//!
//! [`Nsga2Config`] holds all parameters that control the evolutionary loop.

use serde::{Deserialize, Serialize};

/// Configuration for the NSGA-II runner.
///
/// # Defaults
///
/// ```
/// use dcsite::ga::Nsga2Config;
///
/// let config = Nsga2Config::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 50);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use dcsite::ga::Nsga2Config;
///
/// let config = Nsga2Config::default()
///     .with_population_size(100)
///     .with_generations(200)
///     .with_crossover_rate(0.9)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nsga2Config {
    /// Number of individuals kept after every survival step.
    pub population_size: usize,

    /// Number of generations to run.
    pub generations: usize,

    /// Probability of applying crossover to a consecutive pair (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability of mutating an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether to evaluate individuals in parallel using rayon.
    ///
    /// Ignored without the `parallel` feature. Results stay deterministic
    /// for a fixed seed either way because evaluation draws no randomness.
    pub parallel: bool,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            crossover_rate: 0.7,
            mutation_rate: 0.2,
            seed: Some(42),
            parallel: false,
        }
    }
}

impl Nsga2Config {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draws a fresh seed on every run.
    pub fn with_random_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Preset for a quick look at the front: population 20, 20 generations.
    pub fn fast() -> Self {
        Self {
            population_size: 20,
            generations: 20,
            ..Self::default()
        }
    }

    /// Preset for a thorough search: population 200, 300 generations.
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            generations: 300,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be within 0..=1".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within 0..=1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Nsga2Config::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.generations, 50);
        assert!((config.crossover_rate - 0.7).abs() < 1e-10);
        assert!((config.mutation_rate - 0.2).abs() < 1e-10);
        assert_eq!(config.seed, Some(42));
        assert!(!config.parallel);
    }

    #[test]
    fn test_builder_pattern() {
        let config = Nsga2Config::default()
            .with_population_size(80)
            .with_generations(120)
            .with_crossover_rate(0.9)
            .with_mutation_rate(0.05)
            .with_parallel(true)
            .with_seed(7);

        assert_eq!(config.population_size, 80);
        assert_eq!(config.generations, 120);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.with_random_seed().seed, None);
    }

    #[test]
    fn test_validate_ok() {
        assert!(Nsga2Config::default().validate().is_ok());
        assert!(Nsga2Config::fast().validate().is_ok());
        assert!(Nsga2Config::quality().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = Nsga2Config::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = Nsga2Config::default().with_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rates_set_directly() {
        let config = Nsga2Config {
            mutation_rate: 1.5,
            ..Nsga2Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = Nsga2Config::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Nsga2Config = toml::from_str("generations = 10\nseed = 3").unwrap();
        assert_eq!(config.generations, 10);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.population_size, 50);
    }
}
