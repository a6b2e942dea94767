//! Min-max normalization.

use super::scorer::Direction;

/// Returns `(min, max)` of `values`, or `None` when empty or any value is NaN.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Min-max normalizes `values` into `[0, 1]`.
///
/// - [`Direction::Benefit`]: `(v - min) / (max - min)`
/// - [`Direction::Cost`]: `(max - v) / (max - min)`, so the cheapest value
///   maps to 1.0 and the most expensive to 0.0
///
/// A column without spread (`max == min`) cannot discriminate between sites
/// and normalizes to all zeros. An empty input yields an empty output.
///
/// # Example
///
/// ```
/// use dcsite::scoring::{normalize, Direction};
///
/// let cost = normalize(&[10.0, 12.0, 9.0], Direction::Cost);
/// assert_eq!(cost, vec![2.0 / 3.0, 0.0, 1.0]);
/// ```
pub fn normalize(values: &[f64], direction: Direction) -> Vec<f64> {
    let Some((min, max)) = min_max(values) else {
        return vec![0.0; values.len()];
    };
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|&v| match direction {
            Direction::Benefit => (v - min) / range,
            Direction::Cost => (max - v) / range,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cost_extremes() {
        let n = normalize(&[50.0, 21.5, 80.0, 20.0], Direction::Cost);
        assert!((n[3] - 1.0).abs() < 1e-12); // min cost -> 1
        assert!((n[2] - 0.0).abs() < 1e-12); // max cost -> 0
    }

    #[test]
    fn test_benefit_extremes() {
        let n = normalize(&[3.0, 9.0, 6.0], Direction::Benefit);
        assert_eq!(n, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_constant_column() {
        assert_eq!(normalize(&[7.0, 7.0, 7.0], Direction::Cost), vec![0.0; 3]);
        assert_eq!(normalize(&[7.0], Direction::Benefit), vec![0.0]);
    }

    #[test]
    fn test_empty() {
        assert!(normalize(&[], Direction::Benefit).is_empty());
        assert!(min_max(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_normalized_in_unit_interval(values in prop::collection::vec(-1e6f64..1e6, 1..30)) {
            for direction in [Direction::Benefit, Direction::Cost] {
                for v in normalize(&values, direction) {
                    prop_assert!((0.0..=1.0).contains(&v));
                }
            }
        }

        #[test]
        fn prop_cost_is_mirror_of_benefit(values in prop::collection::vec(-1e3f64..1e3, 2..20)) {
            let b = normalize(&values, Direction::Benefit);
            let c = normalize(&values, Direction::Cost);
            let (min, max) = min_max(&values).unwrap();
            for (x, y) in b.iter().zip(c.iter()) {
                if max > min {
                    prop_assert!((x + y - 1.0).abs() < 1e-9);
                } else {
                    prop_assert!(*x == 0.0 && *y == 0.0);
                }
            }
        }
    }
}
