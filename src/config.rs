//! TOML run configuration.
//!
//! Every section is optional; a missing section keeps the defaults of the
//! corresponding module. A minimal file:
//!
//! ```toml
//! [[criteria]]
//! attribute = "Energy"
//! weight = 0.6
//! direction = "cost"
//!
//! [[criteria]]
//! attribute = "Network"
//! weight = 0.4
//! direction = "benefit"
//!
//! [nsga2]
//! generations = 100
//! seed = 7
//! ```

use crate::cluster::KMeans;
use crate::error::{Error, Result};
use crate::ga::Nsga2Config;
use crate::gravity::{GravityInput, GravityParams};
use crate::portfolio::PortfolioWeights;
use crate::scoring::{Criterion, WeightedScorer};
use crate::scrape::RetryPolicy;
use crate::select::{CapacityWeights, SingleSiteWeights};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters of one toolkit run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Scoring criteria; empty means the built-in weighting.
    pub criteria: Vec<Criterion>,
    pub gravity: GravityConfig,
    pub capacity: CapacityWeights,
    pub single_site: SingleSiteWeights,
    pub nsga2: Nsga2Config,
    pub portfolio: PortfolioWeights,
    pub kmeans: KMeans,
    pub scrape: ScrapeConfig,
}

/// Gravity model parameters and an optional custom input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    #[serde(flatten)]
    pub params: GravityParams,
    /// Replaces the built-in demo candidates, demand points and distances.
    pub input: Option<GravityInput>,
}

/// Network settings of the scrapers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
    /// Seed of the pacing delays; random when unset.
    pub seed: Option<u64>,
    /// Disables the courtesy delays. Only for local mirrors.
    pub no_pacing: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retry: RetryPolicy::default(),
            seed: None,
            no_pacing: false,
        }
    }
}

impl RunConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The configured scorer, or `fallback` when no criteria are set.
    pub fn scorer_or(&self, fallback: WeightedScorer) -> Result<WeightedScorer> {
        if self.criteria.is_empty() {
            Ok(fallback)
        } else {
            WeightedScorer::new(self.criteria.clone())
        }
    }

    /// Checks cross-section consistency.
    pub fn validate(&self) -> Result<()> {
        if !self.criteria.is_empty() {
            WeightedScorer::new(self.criteria.clone())?;
        }
        let g = &self.gravity.params;
        if [g.cost_weight, g.efficiency_weight, g.renewable_weight, g.decay]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(Error::Config("gravity parameters must be finite".into()));
        }
        self.nsga2.validate().map_err(Error::Config)?;
        let p = &self.portfolio;
        if [p.pue, p.ixp, p.service, p.age].iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::Config("portfolio weights must be finite and non-negative".into()));
        }
        if self.kmeans.k == 0 {
            return Err(Error::Config("kmeans.k must be at least 1".into()));
        }
        if self.scrape.retry.max_attempts == 0 {
            return Err(Error::Config("scrape.retry.max_attempts must be at least 1".into()));
        }
        if self.scrape.timeout_secs == 0 {
            return Err(Error::Config("scrape.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Loads and validates a TOML run file.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    RunConfig::from_toml(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Direction;

    #[test]
    fn test_empty_file_is_default() {
        let config = RunConfig::from_toml("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.nsga2.population_size, 50);
        assert_eq!(config.scrape.retry.max_attempts, 3);
    }

    #[test]
    fn test_sections() {
        let config = RunConfig::from_toml(
            r#"
            [[criteria]]
            attribute = "Energy"
            weight = 0.6
            direction = "cost"

            [gravity]
            decay = 2.0

            [capacity]
            required_capacity = 120.0

            [nsga2]
            generations = 10
            seed = 7

            [kmeans]
            k = 3

            [scrape.retry]
            max_attempts = 5
            backoff = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.criteria.len(), 1);
        assert_eq!(config.criteria[0].direction, Direction::Cost);
        assert_eq!(config.gravity.params.decay, 2.0);
        assert_eq!(config.gravity.params.cost_weight, 1.0);
        assert_eq!(config.capacity.required_capacity, 120.0);
        assert_eq!(config.nsga2.generations, 10);
        assert_eq!(config.nsga2.seed, Some(7));
        assert_eq!(config.kmeans.k, 3);
        assert_eq!(config.kmeans.n_init, 10);
        assert_eq!(config.scrape.retry.max_attempts, 5);
    }

    #[test]
    fn test_gravity_input_section() {
        let config = RunConfig::from_toml(
            r#"
            [gravity.input]
            distances = [[1.0, 2.0]]
            [[gravity.input.candidates]]
            name = "X"
            cost = 10.0
            efficiency = 0.5
            renewable = 0.5
            [[gravity.input.candidates]]
            name = "Y"
            cost = 20.0
            efficiency = 0.5
            renewable = 0.5
            [[gravity.input.demand]]
            name = "D"
            weight = 100.0
            "#,
        )
        .unwrap();
        let input = config.gravity.input.unwrap();
        assert_eq!(input.candidates.len(), 2);
        assert_eq!(input.distances, vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(RunConfig::from_toml("unknown = 1").is_err());
        assert!(RunConfig::from_toml("[nsga2]\npopulation_size = 1").is_err());
        assert!(RunConfig::from_toml("[kmeans]\nk = 0").is_err());
        assert!(RunConfig::from_toml(
            "[[criteria]]\nattribute = \"A\"\nweight = -1.0\ndirection = \"cost\""
        )
        .is_err());
    }

    #[test]
    fn test_scorer_fallback() {
        let config = RunConfig::default();
        let scorer = config.scorer_or(WeightedScorer::gravity_default()).unwrap();
        assert_eq!(scorer.criteria().len(), 8);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[portfolio]\npue = 0.5\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.portfolio.pue, 0.5);
        assert_eq!(config.portfolio.ixp, 0.3);
        assert!(load_config(&dir.path().join("none.toml")).is_err());
    }
}
