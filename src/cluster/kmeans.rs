//! Lloyd's k-means with k-means++ seeding.

use super::scaler::check_matrix;
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// K-means configuration.
///
/// # Example
///
/// ```
/// use dcsite::cluster::KMeans;
///
/// let data = vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![5.0, 5.0], vec![5.1, 5.0]];
/// let fit = KMeans::new(2).with_seed(42).fit(&data).unwrap();
/// assert_eq!(fit.labels[0], fit.labels[1]);
/// assert_ne!(fit.labels[0], fit.labels[2]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeans {
    /// Number of clusters.
    pub k: usize,
    /// Maximum Lloyd iterations per restart.
    pub max_iter: usize,
    /// Independent restarts; the fit with the lowest inertia wins.
    pub n_init: usize,
    /// Stop when no centroid moves more than this (squared distance).
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k: 2,
            max_iter: 300,
            n_init: 10,
            tolerance: 1e-8,
            seed: 42,
        }
    }
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster index per input row.
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances of rows to their centroid.
    pub inertia: f64,
    /// Lloyd iterations of the winning restart.
    pub iterations: usize,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    pub fn with_n_init(mut self, n: usize) -> Self {
        self.n_init = n;
        self
    }

    /// Validates the configuration against a data set of `rows` rows.
    pub fn validate(&self, rows: usize) -> Result<()> {
        if self.k == 0 {
            return Err(Error::Config("k must be at least 1".into()));
        }
        if self.k > rows {
            return Err(Error::Config(format!(
                "k = {} exceeds the number of rows ({rows})",
                self.k
            )));
        }
        if self.max_iter == 0 || self.n_init == 0 {
            return Err(Error::Config("max_iter and n_init must be at least 1".into()));
        }
        Ok(())
    }

    /// Clusters the rows of `data`.
    ///
    /// Deterministic for a given `seed`.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KMeansFit> {
        check_matrix(data)?;
        self.validate(data.len())?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;
        for run in 0..self.n_init {
            let fit = self.lloyd(data, &mut rng);
            debug!(run, inertia = fit.inertia, iterations = fit.iterations, "k-means restart");
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.ok_or_else(|| Error::Config("n_init must be at least 1".into()))
    }

    fn lloyd(&self, data: &[Vec<f64>], rng: &mut StdRng) -> KMeansFit {
        let mut centroids = plus_plus_init(data, self.k, rng);
        let mut labels = vec![0usize; data.len()];
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;
            for (label, row) in labels.iter_mut().zip(data) {
                *label = nearest(&centroids, row).0;
            }

            let mut updated = vec![vec![0.0f64; data[0].len()]; self.k];
            let mut counts = vec![0usize; self.k];
            for (row, &label) in data.iter().zip(&labels) {
                counts[label] += 1;
                for (u, x) in updated[label].iter_mut().zip(row) {
                    *u += x;
                }
            }
            for (c, centroid) in updated.iter_mut().enumerate() {
                if counts[c] == 0 {
                    // Empty cluster: restart it on the worst-served row.
                    *centroid = farthest_row(data, &centroids).clone();
                } else {
                    centroid.iter_mut().for_each(|u| *u /= counts[c] as f64);
                }
            }

            let shift = centroids
                .iter()
                .zip(&updated)
                .map(|(a, b)| squared_distance(a, b))
                .fold(0.0, f64::max);
            centroids = updated;
            if shift <= self.tolerance {
                break;
            }
        }

        for (label, row) in labels.iter_mut().zip(data) {
            *label = nearest(&centroids, row).0;
        }
        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(row, &l)| squared_distance(row, &centroids[l]))
            .sum();

        KMeansFit {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

/// k-means++: each next centroid is drawn with probability proportional to
/// its squared distance from the nearest centroid chosen so far.
fn plus_plus_init(data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = vec![data[rng.random_range(0..data.len())].clone()];
    while centroids.len() < k {
        let weights: Vec<f64> = data.iter().map(|row| nearest(&centroids, row).1).collect();
        let total: f64 = weights.iter().sum();
        let next = if total <= 0.0 {
            rng.random_range(0..data.len())
        } else {
            let mut target = rng.random_range(0.0..total);
            weights
                .iter()
                .position(|&w| {
                    target -= w;
                    target < 0.0
                })
                .unwrap_or(data.len() - 1)
        };
        centroids.push(data[next].clone());
    }
    centroids
}

/// Index of and squared distance to the nearest centroid.
pub(crate) fn nearest(centroids: &[Vec<f64>], row: &[f64]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(c, row)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

fn farthest_row<'d>(data: &'d [Vec<f64>], centroids: &[Vec<f64>]) -> &'d Vec<f64> {
    data.iter()
        .map(|row| (row, nearest(centroids, row).1))
        .fold((&data[0], f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
        .0
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
