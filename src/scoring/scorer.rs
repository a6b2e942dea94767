//! Weighted-sum scorer.

use super::normalize::normalize;
use crate::error::{Error, Result};
use crate::record::SiteTable;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether higher or lower attribute values are desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Higher is better (renewable share, connectivity, land availability).
    Benefit,
    /// Lower is better (energy price, land cost, water cost).
    Cost,
}

/// One scoring criterion: an attribute, its weight and its direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub attribute: String,
    pub weight: f64,
    pub direction: Direction,
}

impl Criterion {
    pub fn benefit(attribute: impl Into<String>, weight: f64) -> Self {
        Self {
            attribute: attribute.into(),
            weight,
            direction: Direction::Benefit,
        }
    }

    pub fn cost(attribute: impl Into<String>, weight: f64) -> Self {
        Self {
            attribute: attribute.into(),
            weight,
            direction: Direction::Cost,
        }
    }
}

/// A scored site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSite {
    pub name: String,
    /// Composite weighted score.
    pub score: f64,
    /// Normalized value per criterion, in criterion order.
    pub normalized: Vec<f64>,
}

/// Weighted min-max scorer over a fixed criterion set.
///
/// # Example
///
/// ```
/// use dcsite::record::SiteTable;
/// use dcsite::scoring::{Criterion, WeightedScorer};
///
/// let table = SiteTable::from_columns(
///     &["Mumbai", "Nagpur"],
///     &[("Energy", &[7.5, 7.0]), ("Network", &[10.0, 5.0])],
/// ).unwrap();
/// let scorer = WeightedScorer::new(vec![
///     Criterion::cost("Energy", 0.2),
///     Criterion::benefit("Network", 0.2),
/// ]).unwrap();
/// let ranked = scorer.score(&table).unwrap();
/// assert_eq!(ranked.len(), 2);
/// assert!((ranked[0].score - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    criteria: Vec<Criterion>,
}

impl WeightedScorer {
    /// Creates a scorer after validating the criteria.
    ///
    /// Rejects an empty set, duplicate attributes and weights that are
    /// negative or non-finite.
    pub fn new(criteria: Vec<Criterion>) -> Result<Self> {
        if criteria.is_empty() {
            return Err(Error::InvalidCriterion("at least one criterion is required".into()));
        }
        for (i, c) in criteria.iter().enumerate() {
            if !c.weight.is_finite() || c.weight < 0.0 {
                return Err(Error::InvalidCriterion(format!(
                    "weight of `{}` must be finite and non-negative, got {}",
                    c.attribute, c.weight
                )));
            }
            if criteria[..i].iter().any(|o| o.attribute == c.attribute) {
                return Err(Error::InvalidCriterion(format!(
                    "duplicate criterion `{}`",
                    c.attribute
                )));
            }
        }
        Ok(Self { criteria })
    }

    /// The weighting scheme of the 13-city composite attraction model.
    pub fn gravity_default() -> Self {
        Self {
            criteria: vec![
                Criterion::cost("Water", 0.05),
                Criterion::cost("Energy", 0.20),
                Criterion::cost("Workforce", 0.05),
                Criterion::cost("LandCost", 0.15),
                Criterion::benefit("Renewable", 0.10),
                Criterion::benefit("LandAvail", 0.05),
                Criterion::benefit("Network", 0.20),
                Criterion::benefit("Climate", 0.10),
            ],
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }

    /// Scores every site in `table` and returns them ranked best first.
    ///
    /// Ties keep the table order.
    pub fn score(&self, table: &SiteTable) -> Result<Vec<ScoredSite>> {
        let normalized: Vec<Vec<f64>> = self
            .criteria
            .iter()
            .map(|c| table.column(&c.attribute).map(|col| normalize(&col, c.direction)))
            .collect::<Result<_>>()?;

        let mut scored: Vec<ScoredSite> = table
            .sites()
            .iter()
            .enumerate()
            .map(|(row, site)| {
                let values: Vec<f64> = normalized.iter().map(|col| col[row]).collect();
                let score: f64 = values
                    .iter()
                    .zip(&self.criteria)
                    .map(|(v, c)| v * c.weight)
                    .sum();
                ScoredSite {
                    name: site.name.clone(),
                    score,
                    normalized: values,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        debug!(sites = scored.len(), criteria = self.criteria.len(), "scored site table");
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets;

    #[test]
    fn test_rejects_bad_weights() {
        assert!(WeightedScorer::new(vec![]).is_err());
        assert!(WeightedScorer::new(vec![Criterion::cost("A", -0.1)]).is_err());
        assert!(WeightedScorer::new(vec![Criterion::cost("A", f64::NAN)]).is_err());
        assert!(
            WeightedScorer::new(vec![Criterion::cost("A", 0.1), Criterion::benefit("A", 0.2)])
                .is_err()
        );
    }

    #[test]
    fn test_missing_attribute() {
        let table = SiteTable::from_columns(&["A"], &[("Cost", &[1.0])]).unwrap();
        let scorer = WeightedScorer::new(vec![Criterion::cost("Price", 1.0)]).unwrap();
        assert!(matches!(scorer.score(&table), Err(Error::MissingAttribute { .. })));
    }

    #[test]
    fn test_dominant_site_scores_total_weight() {
        let table = SiteTable::from_columns(
            &["good", "bad"],
            &[("Cost", &[1.0, 5.0]), ("Quality", &[9.0, 2.0])],
        )
        .unwrap();
        let scorer = WeightedScorer::new(vec![
            Criterion::cost("Cost", 0.6),
            Criterion::benefit("Quality", 0.4),
        ])
        .unwrap();
        let ranked = scorer.score(&table).unwrap();
        assert_eq!(ranked[0].name, "good");
        assert!((ranked[0].score - 1.0).abs() < 1e-12);
        assert!(ranked[1].score.abs() < 1e-12);
        assert_eq!(ranked[0].normalized, vec![1.0, 1.0]);
    }

    #[test]
    fn test_gravity_cities_ranking() {
        let table = datasets::indian_cities();
        let ranked = WeightedScorer::gravity_default().score(&table).unwrap();
        assert_eq!(ranked.len(), 13);
        // Scores are sorted and bounded by the total weight.
        for w in ranked.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
        let total = WeightedScorer::gravity_default().total_weight();
        assert!((total - 0.9).abs() < 1e-12);
        assert!(ranked.iter().all(|s| s.score >= 0.0 && s.score <= total));
        // Mumbai: most expensive land and water-heavy, but best network.
        let mumbai = ranked.iter().find(|s| s.name == "Mumbai").unwrap();
        assert_eq!(mumbai.normalized[3], 0.0); // LandCost is the max
        assert_eq!(mumbai.normalized[6], 1.0); // Network is the max
    }
}
