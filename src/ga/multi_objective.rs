//! Pareto dominance utilities.
//!
//! Ranking and spread measures behind [`Nsga2Runner`](super::Nsga2Runner),
//! public so that callers can post-process objective vectors themselves.
//! Every objective is minimized.
//!
//! # Algorithms
//!
//! - [`dominates`]: dominance test between two objective vectors
//! - [`non_dominated_sort`]: front-by-front ranking (Deb et al., 2002)
//! - [`crowding_distance`]: neighbour spacing within one front
//! - [`pareto_front_indices`]: members of the first front
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use std::cmp::Ordering;

/// Pareto ranks and the fronts they induce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NondominatedSortResult {
    /// Front number of every input vector; 0 is the Pareto front.
    pub ranks: Vec<usize>,

    /// Input indices per front, ascending within a front.
    pub fronts: Vec<Vec<usize>>,
}

/// Whether `a` Pareto-dominates `b`.
///
/// `a` dominates `b` when it is no worse in every objective and strictly
/// better in at least one. Identical vectors do not dominate each other.
///
/// ```
/// use dcsite::ga::multi_objective::dominates;
///
/// // (total PUE, -IXP count)
/// assert!(dominates(&[2.6, -7.0], &[2.6, -5.0]));
/// assert!(!dominates(&[2.6, -7.0], &[2.4, -9.0]));
/// assert!(!dominates(&[2.6, -7.0], &[2.6, -7.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    compare(a, b) == Some(Ordering::Less)
}

/// `Less` when `a` dominates `b`, `Greater` when `b` dominates `a`, `None`
/// when neither does.
fn compare(a: &[f64], b: &[f64]) -> Option<Ordering> {
    let (mut a_wins, mut b_wins) = (false, false);
    for (x, y) in a.iter().zip(b) {
        match x.partial_cmp(y) {
            Some(Ordering::Less) => a_wins = true,
            Some(Ordering::Greater) => b_wins = true,
            _ => {}
        }
        if a_wins && b_wins {
            return None;
        }
    }
    match (a_wins, b_wins) {
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        _ => None,
    }
}

/// Ranks objective vectors into successive non-dominated fronts.
///
/// Front 0 holds the vectors nobody dominates; front `k + 1` holds those
/// dominated only by members of fronts `0..=k`. Pairwise comparison makes
/// this O(m · n²) for `n` vectors of `m` objectives. An empty input yields
/// no ranks and no fronts.
///
/// # Example
///
/// ```
/// use dcsite::ga::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
///     vec![4.0, 4.0], // worse than [3, 3] in both
/// ];
///
/// let sorted = non_dominated_sort(&objectives);
/// assert_eq!(sorted.fronts[0], vec![0, 1, 2]);
/// assert_eq!(sorted.ranks[3], 1);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    debug_assert!(
        objectives.windows(2).all(|w| w[0].len() == w[1].len()),
        "objective vectors differ in length"
    );

    // beats[i]: indices i dominates; pending[j]: how many vectors dominate j
    let mut beats: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut pending = vec![0usize; n];
    for i in 0..n {
        for j in i + 1..n {
            let (winner, loser) = match compare(&objectives[i], &objectives[j]) {
                Some(Ordering::Less) => (i, j),
                Some(Ordering::Greater) => (j, i),
                _ => continue,
            };
            beats[winner].push(loser);
            pending[loser] += 1;
        }
    }

    let mut ranks = vec![0usize; n];
    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut front: Vec<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
    while !front.is_empty() {
        let rank = fronts.len();
        let mut released = Vec::new();
        for &i in &front {
            ranks[i] = rank;
            for &j in &beats[i] {
                pending[j] -= 1;
                if pending[j] == 0 {
                    released.push(j);
                }
            }
        }
        released.sort_unstable();
        fronts.push(front);
        front = released;
    }

    NondominatedSortResult { ranks, fronts }
}

/// Indices of the non-dominated vectors, in input order.
pub fn pareto_front_indices(objectives: &[Vec<f64>]) -> Vec<usize> {
    non_dominated_sort(objectives)
        .fronts
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Crowding distance of every vector of one front.
///
/// For each objective the vectors are ordered by that objective; the two
/// extremes get infinity and every interior vector adds the normalized gap
/// between its two neighbours. Larger means more isolated. Objectives with
/// no spread contribute nothing.
///
/// # Example
///
/// ```
/// use dcsite::ga::multi_objective::crowding_distance;
///
/// let front = vec![vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]];
/// let d = crowding_distance(&front);
/// assert!(d[0].is_infinite() && d[2].is_infinite());
/// assert_eq!(d[1], 2.0);
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n < 3 {
        return vec![f64::INFINITY; n];
    }

    let mut crowding = vec![0.0f64; n];
    let mut order: Vec<usize> = (0..n).collect();
    for k in 0..objectives[0].len() {
        let value = |i: usize| objectives[i][k];
        order.sort_by(|&a, &b| value(a).partial_cmp(&value(b)).unwrap_or(Ordering::Equal));

        let (lo, hi) = (order[0], order[n - 1]);
        crowding[lo] = f64::INFINITY;
        crowding[hi] = f64::INFINITY;

        let spread = value(hi) - value(lo);
        if spread <= 0.0 {
            continue;
        }
        for w in order.windows(3) {
            crowding[w[1]] += (value(w[2]) - value(w[0])) / spread;
        }
    }
    crowding
}
