//! NSGA-II evolutionary loop execution.
//!
//! [`Nsga2Runner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → variation → (μ+λ) survival → repeat.

use super::config::Nsga2Config;
use super::multi_objective::{crowding_distance, non_dominated_sort};
use super::types::MultiObjectiveProblem;
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

/// Result of an NSGA-II run.
#[derive(Debug, Clone)]
pub struct Nsga2Result<I> {
    /// Final population, after the last survival step.
    pub population: Vec<I>,

    /// Objective vectors, index-aligned with `population`.
    pub objectives: Vec<Vec<f64>>,

    /// Indices into `population` of the non-dominated individuals.
    pub pareto_front: Vec<usize>,

    /// Total number of generations executed.
    pub generations: usize,
}

impl<I> Nsga2Result<I> {
    /// Pareto-optimal individuals with their objective vectors.
    pub fn front(&self) -> impl Iterator<Item = (&I, &[f64])> {
        self.pareto_front
            .iter()
            .map(|&i| (&self.population[i], self.objectives[i].as_slice()))
    }
}

/// Executes the NSGA-II loop.
///
/// Each generation clones the population, applies crossover to
/// consecutive pairs with probability `crossover_rate` and then mutation
/// to each offspring with probability `mutation_rate`. Parents and
/// offspring are pooled and the best `population_size` survive by Pareto
/// rank, the last admitted front truncated by descending crowding distance.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = Nsga2Config::default().with_seed(42);
/// let result = Nsga2Runner::run(&problem, &config)?;
/// for (ind, objs) in result.front() { ... }
/// ```
pub struct Nsga2Runner;

impl Nsga2Runner {
    /// Runs the optimization.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for an invalid configuration and
    /// [`Error::DimensionMismatch`] when `evaluate` returns a vector of the
    /// wrong length.
    pub fn run<P: MultiObjectiveProblem>(
        problem: &P,
        config: &Nsga2Config,
    ) -> Result<Nsga2Result<P::Individual>> {
        config.validate().map_err(Error::Config)?;

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let n = config.population_size;

        // 1. Initialize and evaluate
        let mut population: Vec<P::Individual> =
            (0..n).map(|_| problem.create_individual(&mut rng)).collect();
        let mut objectives = evaluate_all(problem, &population, config.parallel)?;

        // 2. Evolutionary loop
        for generation in 1..=config.generations {
            let offspring = vary(problem, &population, config, &mut rng);
            let offspring_objectives = evaluate_all(problem, &offspring, config.parallel)?;

            population.extend(offspring);
            objectives.extend(offspring_objectives);

            let survivors = select_survivors(&objectives, n);
            (population, objectives) = take_indices(population, objectives, &survivors);

            let front_size = non_dominated_sort(&objectives)
                .fronts
                .first()
                .map_or(0, Vec::len);
            debug!(generation, front_size, "nsga2 generation");
        }

        let pareto_front = non_dominated_sort(&objectives)
            .fronts
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(Nsga2Result {
            population,
            objectives,
            pareto_front,
            generations: config.generations,
        })
    }
}

/// Clone, pairwise crossover, then per-offspring mutation.
fn vary<P: MultiObjectiveProblem>(
    problem: &P,
    population: &[P::Individual],
    config: &Nsga2Config,
    rng: &mut StdRng,
) -> Vec<P::Individual> {
    let mut offspring = population.to_vec();

    for pair in offspring.chunks_exact_mut(2) {
        if rng.random_bool(config.crossover_rate) {
            let (first, second) = pair.split_at_mut(1);
            problem.crossover(&mut first[0], &mut second[0], rng);
        }
    }
    for child in offspring.iter_mut() {
        if rng.random_bool(config.mutation_rate) {
            problem.mutate(child, rng);
        }
    }

    offspring
}

/// Indices of the `k` survivors of the pooled population.
fn select_survivors(objectives: &[Vec<f64>], k: usize) -> Vec<usize> {
    let sorted = non_dominated_sort(objectives);
    let mut chosen = Vec::with_capacity(k);

    for front in sorted.fronts {
        if chosen.len() + front.len() <= k {
            chosen.extend(front);
            if chosen.len() == k {
                break;
            }
            continue;
        }

        let front_objectives: Vec<Vec<f64>> =
            front.iter().map(|&i| objectives[i].clone()).collect();
        let distance = crowding_distance(&front_objectives);
        let mut order: Vec<usize> = (0..front.len()).collect();
        order.sort_by(|&a, &b| {
            distance[b]
                .partial_cmp(&distance[a])
                .unwrap_or(Ordering::Equal)
        });
        let remaining = k - chosen.len();
        chosen.extend(order.into_iter().take(remaining).map(|i| front[i]));
        break;
    }

    chosen
}

fn take_indices<I: Clone>(
    population: Vec<I>,
    objectives: Vec<Vec<f64>>,
    keep: &[usize],
) -> (Vec<I>, Vec<Vec<f64>>) {
    let population = keep.iter().map(|&i| population[i].clone()).collect();
    let objectives = keep.iter().map(|&i| objectives[i].clone()).collect();
    (population, objectives)
}

/// Evaluate every individual, checking the objective count.
fn evaluate_all<P: MultiObjectiveProblem>(
    problem: &P,
    individuals: &[P::Individual],
    parallel: bool,
) -> Result<Vec<Vec<f64>>> {
    #[cfg(feature = "parallel")]
    let objectives: Vec<Vec<f64>> = if parallel {
        individuals.par_iter().map(|ind| problem.evaluate(ind)).collect()
    } else {
        individuals.iter().map(|ind| problem.evaluate(ind)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let objectives: Vec<Vec<f64>> = {
        let _ = parallel;
        individuals.iter().map(|ind| problem.evaluate(ind)).collect()
    };

    let expected = problem.objective_count();
    if let Some(bad) = objectives.iter().find(|o| o.len() != expected) {
        return Err(Error::DimensionMismatch {
            expected,
            actual: bad.len(),
            context: "objective vector",
        });
    }
    Ok(objectives)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::multi_objective::dominates;
    use crate::ga::operators::{flip_bit_mutation, random_bits, two_point_crossover};

    // ---- Bi-objective bit string: ones in the first half vs. second half ----

    /// Minimize (-ones(left), -ones(right)) subject to at most `cap` ones.
    struct SplitOnes {
        n: usize,
        cap: usize,
    }

    impl MultiObjectiveProblem for SplitOnes {
        type Individual = Vec<bool>;

        fn objective_count(&self) -> usize {
            2
        }

        fn create_individual<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
            random_bits(self.n, rng)
        }

        fn evaluate(&self, ind: &Vec<bool>) -> Vec<f64> {
            let total = ind.iter().filter(|&&b| b).count();
            if total > self.cap {
                return vec![total as f64, total as f64];
            }
            let half = self.n / 2;
            let left = ind[..half].iter().filter(|&&b| b).count();
            vec![-(left as f64), -((total - left) as f64)]
        }

        fn crossover<R: Rng>(&self, a: &mut Vec<bool>, b: &mut Vec<bool>, rng: &mut R) {
            two_point_crossover(a, b, rng);
        }

        fn mutate<R: Rng>(&self, ind: &mut Vec<bool>, rng: &mut R) {
            flip_bit_mutation(ind, 0.1, rng);
        }
    }

    fn config() -> Nsga2Config {
        Nsga2Config::default()
            .with_population_size(30)
            .with_generations(40)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_front_is_non_dominated() {
        let problem = SplitOnes { n: 12, cap: 6 };
        let result = Nsga2Runner::run(&problem, &config()).unwrap();

        assert_eq!(result.population.len(), 30);
        assert_eq!(result.objectives.len(), 30);
        assert!(!result.pareto_front.is_empty());
        for (_, objs) in result.front() {
            for other in &result.objectives {
                assert!(!dominates(other, objs));
            }
        }
    }

    #[test]
    fn test_converges_to_trade_off_curve() {
        let problem = SplitOnes { n: 12, cap: 6 };
        let result = Nsga2Runner::run(&problem, &config().with_generations(80)).unwrap();

        // Optimal points use the full budget: left + right == 6.
        let best_total = result
            .front()
            .map(|(_, o)| -(o[0] + o[1]))
            .fold(f64::MIN, f64::max);
        assert_eq!(best_total, 6.0);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let problem = SplitOnes { n: 16, cap: 8 };
        let a = Nsga2Runner::run(&problem, &config()).unwrap();
        let b = Nsga2Runner::run(&problem, &config()).unwrap();
        assert_eq!(a.population, b.population);
        assert_eq!(a.objectives, b.objectives);
        assert_eq!(a.pareto_front, b.pareto_front);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = SplitOnes { n: 16, cap: 8 };
        let seq = Nsga2Runner::run(&problem, &config()).unwrap();
        let par = Nsga2Runner::run(&problem, &config().with_parallel(true)).unwrap();
        assert_eq!(seq.population, par.population);
    }

    #[test]
    fn test_runs_every_generation() {
        let problem = SplitOnes { n: 10, cap: 5 };
        let result = Nsga2Runner::run(&problem, &config().with_generations(7)).unwrap();
        assert_eq!(result.generations, 7);
        assert_eq!(result.population.len(), 30);

        let err = Nsga2Runner::run(&problem, &config().with_generations(0));
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_config() {
        let problem = SplitOnes { n: 10, cap: 5 };
        let err = Nsga2Runner::run(&problem, &config().with_population_size(1));
        assert!(matches!(err, Err(Error::Config(_))));
    }

    struct WrongArity;

    impl MultiObjectiveProblem for WrongArity {
        type Individual = Vec<bool>;
        fn objective_count(&self) -> usize {
            3
        }
        fn create_individual<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
            random_bits(4, rng)
        }
        fn evaluate(&self, _ind: &Vec<bool>) -> Vec<f64> {
            vec![0.0, 0.0]
        }
    }

    #[test]
    fn test_objective_count_checked() {
        let err = Nsga2Runner::run(&WrongArity, &config());
        assert!(matches!(
            err,
            Err(Error::DimensionMismatch { expected: 3, actual: 2, .. })
        ));
    }

    // ---- Survival ----

    #[test]
    fn test_select_survivors_fills_by_rank() {
        let objs = vec![
            vec![1.0, 5.0], // front 0
            vec![5.0, 1.0], // front 0
            vec![6.0, 6.0], // front 2
            vec![3.0, 3.0], // front 0
            vec![4.0, 4.0], // front 1
        ];
        let mut chosen = select_survivors(&objs, 4);
        chosen.sort_unstable();
        assert_eq!(chosen, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_select_survivors_truncates_by_crowding() {
        let objs = vec![
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![1.1, 2.9],
            vec![4.0, 0.0],
        ];
        // Crowding: [1] = 0.55, [2] = 1.5, boundaries infinite.
        let mut chosen = select_survivors(&objs, 3);
        chosen.sort_unstable();
        assert_eq!(chosen, vec![0, 2, 3]);
    }
}
