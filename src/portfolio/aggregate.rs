//! Flattening Pareto solutions into ranked facility rows.

use super::problem::PortfolioProblem;
use crate::scoring::{normalize, Direction};
use serde::{Deserialize, Serialize};

/// Weights of the post-aggregation score.
///
/// ```text
/// score = −w_pue · n(PUE) + w_ixp · n(IXP) + w_service · n(Service) − w_age · n(Age)
/// ```
///
/// where `n` is min-max normalization over all aggregated rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioWeights {
    pub pue: f64,
    pub ixp: f64,
    pub service: f64,
    pub age: f64,
}

impl Default for PortfolioWeights {
    fn default() -> Self {
        Self {
            pue: 0.4,
            ixp: 0.3,
            service: 0.2,
            age: 0.1,
        }
    }
}

/// One selected facility of one Pareto solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRow {
    /// 1-based solution number.
    #[serde(rename = "Solution #")]
    pub solution: usize,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "PUE")]
    pub pue: f64,
    #[serde(rename = "IXP Count")]
    pub ixp_count: f64,
    #[serde(rename = "Service Score")]
    pub service_score: u32,
    #[serde(rename = "Facility Age")]
    pub facility_age: i32,
    /// Filled in by [`score_rows`].
    #[serde(rename = "Weighted Score")]
    pub weighted_score: Option<f64>,
}

/// One row per selected record of every solution in `front`.
///
/// Identical selections appearing more than once on the front are listed
/// once. Every selected record is listed, including ones that were not
/// eligible and therefore did not count toward the objectives.
pub fn aggregate<'f>(
    problem: &PortfolioProblem<'_>,
    front: impl IntoIterator<Item = &'f Vec<bool>>,
) -> Vec<PortfolioRow> {
    let mut seen: Vec<&Vec<bool>> = Vec::new();
    let mut rows = Vec::new();

    for mask in front {
        if seen.contains(&mask) {
            continue;
        }
        seen.push(mask);
        let solution = seen.len();
        rows.extend(problem.selected(mask).map(|r| PortfolioRow {
            solution,
            location: r.location.clone(),
            city: r.city.clone(),
            state: r.state.clone(),
            pue: r.pue,
            ixp_count: r.ixp_count,
            service_score: r.service_score(),
            facility_age: r.facility_age(problem.reference_year()),
            weighted_score: None,
        }));
    }

    rows
}

/// Weighted score of every row, index-aligned with `rows`.
///
/// A column without spread normalizes to zero and does not contribute.
///
/// # Example
///
/// ```
/// use dcsite::portfolio::{weighted_scores, PortfolioRow, PortfolioWeights};
///
/// let row = |pue: f64, ixp: f64| PortfolioRow {
///     solution: 1,
///     location: "X".into(),
///     city: "Y".into(),
///     state: "Z".into(),
///     pue,
///     ixp_count: ixp,
///     service_score: 5,
///     facility_age: 10,
///     weighted_score: None,
/// };
/// let scores = weighted_scores(&[row(1.2, 3.0), row(1.6, 1.0)], &PortfolioWeights::default());
/// assert!((scores[0] - 0.3).abs() < 1e-12);
/// assert!((scores[1] + 0.4).abs() < 1e-12);
/// ```
pub fn weighted_scores(rows: &[PortfolioRow], weights: &PortfolioWeights) -> Vec<f64> {
    let column = |f: fn(&PortfolioRow) -> f64| {
        let values: Vec<f64> = rows.iter().map(f).collect();
        normalize(&values, Direction::Benefit)
    };
    let pue = column(|r| r.pue);
    let ixp = column(|r| r.ixp_count);
    let service = column(|r| f64::from(r.service_score));
    let age = column(|r| f64::from(r.facility_age));

    (0..rows.len())
        .map(|i| {
            -weights.pue * pue[i] + weights.ixp * ixp[i] + weights.service * service[i]
                - weights.age * age[i]
        })
        .collect()
}

/// Fills [`PortfolioRow::weighted_score`] in place.
pub fn score_rows(rows: &mut [PortfolioRow], weights: &PortfolioWeights) {
    let scores = weighted_scores(rows, weights);
    for (row, score) in rows.iter_mut().zip(scores) {
        row.weighted_score = Some(score);
    }
}
