//! Genetic operators for bit-vector chromosomes.
//!
//! These operate on `&[bool]` selection masks and are domain-agnostic:
//! subset selection, knapsack-style and portfolio problems can use them.
//!
//! # Crossover Operators
//!
//! - [`two_point_crossover`]: swap the segment between two cut points
//!
//! # Mutation Operators
//!
//! - [`flip_bit_mutation`]: flip each bit independently with probability `indpb`
//!
//! # Initialization
//!
//! - [`random_bits`]: uniform random mask
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Two-point crossover.
///
/// Picks two distinct cut points `1 <= a < b <= n` and swaps the segment
/// `a..b` between the parents, in place.
///
/// Chromosomes shorter than two bits are left unchanged.
///
/// # Complexity
/// O(n) time, O(1) space
///
/// # Panics
/// Panics if the parents have different lengths.
///
/// # Example
///
/// ```
/// use dcsite::ga::operators::two_point_crossover;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let mut a = vec![true; 8];
/// let mut b = vec![false; 8];
/// two_point_crossover(&mut a, &mut b, &mut rng);
/// // Total number of ones is conserved.
/// let ones = a.iter().chain(&b).filter(|&&x| x).count();
/// assert_eq!(ones, 8);
/// ```
pub fn two_point_crossover<R: Rng>(first: &mut [bool], second: &mut [bool], rng: &mut R) {
    let n = first.len();
    assert_eq!(n, second.len(), "parents must have equal length");
    if n < 2 {
        return;
    }

    let (start, end) = cut_points(n, rng);
    first[start..end].swap_with_slice(&mut second[start..end]);
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Flip-bit mutation: each bit is inverted with probability `indpb`.
///
/// Returns the number of flipped bits.
///
/// # Complexity
/// O(n)
pub fn flip_bit_mutation<R: Rng>(bits: &mut [bool], indpb: f64, rng: &mut R) -> usize {
    let p = indpb.clamp(0.0, 1.0);
    let mut flipped = 0;
    for bit in bits.iter_mut() {
        if rng.random_bool(p) {
            *bit = !*bit;
            flipped += 1;
        }
    }
    flipped
}

// ============================================================================
// Initialization
// ============================================================================

/// A mask of `n` independent fair coin flips.
pub fn random_bits<R: Rng>(n: usize, rng: &mut R) -> Vec<bool> {
    (0..n).map(|_| rng.random_bool(0.5)).collect()
}

// ============================================================================
// Helpers
// ============================================================================

/// Two distinct cut points `start < end` within `1..=n`.
fn cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(1..=n);
    let mut b = rng.random_range(1..n);
    if b >= a {
        b += 1;
    }
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ones(bits: &[bool]) -> usize {
        bits.iter().filter(|&&b| b).count()
    }

    // ---- Two-point crossover ----

    #[test]
    fn test_two_point_conserves_positions() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let p1: Vec<bool> = (0..10).map(|i| i % 2 == 0).collect();
            let p2: Vec<bool> = (0..10).map(|i| i % 3 == 0).collect();
            let (mut c1, mut c2) = (p1.clone(), p2.clone());
            two_point_crossover(&mut c1, &mut c2, &mut rng);

            // Each position holds the two parental alleles, possibly swapped.
            for i in 0..10 {
                let mut got = [c1[i], c2[i]];
                let mut want = [p1[i], p2[i]];
                got.sort();
                want.sort();
                assert_eq!(got, want);
            }
        }
    }

    #[test]
    fn test_two_point_swaps_contiguous_segment() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut a = vec![true; 12];
            let mut b = vec![false; 12];
            two_point_crossover(&mut a, &mut b, &mut rng);

            let swapped: Vec<usize> = (0..12).filter(|&i| !a[i]).collect();
            assert!(!swapped.is_empty());
            assert!(!swapped.contains(&0), "position 0 is never swapped");
            let span = swapped[swapped.len() - 1] - swapped[0] + 1;
            assert_eq!(span, swapped.len(), "segment must be contiguous");
            assert_eq!(ones(&a) + ones(&b), 12);
        }
    }

    #[test]
    fn test_two_point_short_chromosomes() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut a = vec![true];
        let mut b = vec![false];
        two_point_crossover(&mut a, &mut b, &mut rng);
        assert_eq!((a[0], b[0]), (true, false));

        let mut a: Vec<bool> = Vec::new();
        let mut b: Vec<bool> = Vec::new();
        two_point_crossover(&mut a, &mut b, &mut rng);
        assert!(a.is_empty());
    }

    #[test]
    fn test_two_point_two_bits() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let mut a = vec![true, true];
            let mut b = vec![false, false];
            two_point_crossover(&mut a, &mut b, &mut rng);
            // Only the second bit can move.
            assert_eq!(a, vec![true, false]);
            assert_eq!(b, vec![false, true]);
        }
    }

    // ---- Flip-bit mutation ----

    #[test]
    fn test_flip_bit_extremes() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut bits = vec![false; 16];
        assert_eq!(flip_bit_mutation(&mut bits, 0.0, &mut rng), 0);
        assert_eq!(ones(&bits), 0);

        assert_eq!(flip_bit_mutation(&mut bits, 1.0, &mut rng), 16);
        assert_eq!(ones(&bits), 16);
    }

    #[test]
    fn test_flip_bit_rate() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut bits = vec![false; 10_000];
        let flipped = flip_bit_mutation(&mut bits, 0.05, &mut rng);
        assert_eq!(flipped, ones(&bits));
        assert!((300..700).contains(&flipped), "flipped {flipped} of 10000");
    }

    // ---- Random bits ----

    #[test]
    fn test_random_bits() {
        let mut rng = StdRng::seed_from_u64(42);
        let bits = random_bits(1000, &mut rng);
        assert_eq!(bits.len(), 1000);
        assert!((400..600).contains(&ones(&bits)));
    }

    #[test]
    fn test_random_bits_deterministic() {
        let a = random_bits(64, &mut StdRng::seed_from_u64(5));
        let b = random_bits(64, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    // ---- Cut points helper ----

    #[test]
    fn test_cut_points_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let (start, end) = cut_points(10, &mut rng);
            assert!(1 <= start);
            assert!(start < end);
            assert!(end <= 10);
        }
    }
}
