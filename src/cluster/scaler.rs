//! Feature standardization.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Standardizes features to zero mean and unit variance.
///
/// Uses the population standard deviation. A feature without spread keeps
/// scale 1 so that it maps to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fits the scaler to the rows of `data`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidValue`] for empty input and
    /// [`Error::DimensionMismatch`] for ragged rows.
    pub fn fit(data: &[Vec<f64>]) -> Result<Self> {
        let dim = check_matrix(data)?;
        let n = data.len() as f64;

        let mut mean = vec![0.0f64; dim];
        for row in data {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut squares = vec![0.0f64; dim];
        for row in data {
            for ((s, x), m) in squares.iter_mut().zip(row).zip(&mean) {
                *s += (x - m).powi(2);
            }
        }
        let scale = squares
            .into_iter()
            .map(|s| if s > 0.0 { (s / n).sqrt() } else { 1.0 })
            .collect();

        Ok(Self { mean, scale })
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Standardizes one row.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.dim(),
                actual: row.len(),
                context: "scaler input",
            });
        }
        Ok(row
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((x, m), s)| (x - m) / s)
            .collect())
    }

    /// Standardizes every row.
    pub fn transform_all(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        data.iter().map(|row| self.transform(row)).collect()
    }
}

/// Checks that `data` is a non-empty, rectangular, finite matrix and
/// returns its column count.
pub(crate) fn check_matrix(data: &[Vec<f64>]) -> Result<usize> {
    let first = data
        .first()
        .ok_or_else(|| Error::invalid_value("data", "no rows"))?;
    let dim = first.len();
    if dim == 0 {
        return Err(Error::invalid_value("data", "rows have no features"));
    }
    for row in data {
        if row.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: row.len(),
                context: "feature row",
            });
        }
        if row.iter().any(|x| !x.is_finite()) {
            return Err(Error::invalid_value("data", "non-finite feature value"));
        }
    }
    Ok(dim)
}
