//! Gravity model evaluation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A candidate site for the gravity model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    /// Cost in arbitrary units; lower is better. Must be positive.
    pub cost: f64,
    /// Energy efficiency rating; higher is better.
    pub efficiency: f64,
    /// Renewable energy availability (fraction); higher is better.
    pub renewable: f64,
}

impl Candidate {
    pub fn new(name: impl Into<String>, cost: f64, efficiency: f64, renewable: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            efficiency,
            renewable,
        }
    }
}

/// A demand point with weight `B_i` (population, IT load, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub name: String,
    pub weight: f64,
}

impl DemandPoint {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Model input: candidates, demand points and the distance matrix.
///
/// `distances[i][j]` is the distance from demand point `i` to candidate `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityInput {
    pub candidates: Vec<Candidate>,
    pub demand: Vec<DemandPoint>,
    pub distances: Vec<Vec<f64>>,
}

/// Weights of the attractiveness function and the decay exponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityParams {
    /// θ1, applied to `1 / cost`.
    pub cost_weight: f64,
    /// θ2, applied to efficiency.
    pub efficiency_weight: f64,
    /// θ3, applied to renewable availability.
    pub renewable_weight: f64,
    /// λ, the distance decay exponent.
    pub decay: f64,
}

impl Default for GravityParams {
    fn default() -> Self {
        Self {
            cost_weight: 1.0,
            efficiency_weight: 1.0,
            renewable_weight: 1.0,
            decay: 1.0,
        }
    }
}

/// Per-candidate result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GravityScore {
    pub name: String,
    /// Attractiveness `A_j`.
    pub attractiveness: f64,
    /// Distance decay term `D_j`.
    pub decay: f64,
    /// Optimality score `S_j = A_j · D_j`.
    pub score: f64,
}

/// Evaluates the gravity model.
///
/// # Example
///
/// ```
/// use dcsite::datasets::gravity_demo;
/// use dcsite::gravity::{GravityModel, GravityParams};
///
/// let model = GravityModel::new(GravityParams::default());
/// let best = model.best(&gravity_demo()).unwrap();
/// assert_eq!(best.name, "Site1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GravityModel {
    params: GravityParams,
}

impl GravityModel {
    pub fn new(params: GravityParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GravityParams {
        &self.params
    }

    /// Scores every candidate, in candidate order.
    pub fn evaluate(&self, input: &GravityInput) -> Result<Vec<GravityScore>> {
        validate(input)?;
        let p = &self.params;

        let scores: Vec<GravityScore> = input
            .candidates
            .iter()
            .enumerate()
            .map(|(j, c)| {
                let attractiveness = p.cost_weight * (1.0 / c.cost)
                    + p.efficiency_weight * c.efficiency
                    + p.renewable_weight * c.renewable;
                let decay: f64 = input
                    .demand
                    .iter()
                    .zip(&input.distances)
                    .map(|(d, row)| d.weight * row[j].powf(-p.decay))
                    .sum();
                GravityScore {
                    name: c.name.clone(),
                    attractiveness,
                    decay,
                    score: attractiveness * decay,
                }
            })
            .collect();

        debug!(candidates = scores.len(), decay = p.decay, "evaluated gravity model");
        Ok(scores)
    }

    /// Returns the candidate with the highest score.
    ///
    /// Ties are resolved in favour of the earlier candidate.
    pub fn best(&self, input: &GravityInput) -> Result<GravityScore> {
        let scores = self.evaluate(input)?;
        let mut best: Option<GravityScore> = None;
        for s in scores {
            if best.as_ref().map_or(true, |b| s.score > b.score) {
                best = Some(s);
            }
        }
        best.ok_or_else(|| Error::invalid_value("candidates", "no candidates"))
    }
}

fn validate(input: &GravityInput) -> Result<()> {
    if input.candidates.is_empty() {
        return Err(Error::invalid_value("candidates", "at least one candidate is required"));
    }
    if input.distances.len() != input.demand.len() {
        return Err(Error::DimensionMismatch {
            expected: input.demand.len(),
            actual: input.distances.len(),
            context: "distance matrix rows (demand points)",
        });
    }
    for row in &input.distances {
        if row.len() != input.candidates.len() {
            return Err(Error::DimensionMismatch {
                expected: input.candidates.len(),
                actual: row.len(),
                context: "distance matrix columns (candidates)",
            });
        }
        if let Some(d) = row.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
            return Err(Error::invalid_value("distance", format!("must be positive, got {d}")));
        }
    }
    for c in &input.candidates {
        if !(c.cost.is_finite() && c.cost > 0.0) {
            return Err(Error::invalid_value(
                format!("cost of {}", c.name),
                format!("must be positive, got {}", c.cost),
            ));
        }
    }
    Ok(())
}
