//! Core trait definitions for the NSGA-II engine.
//!
//! [`MultiObjectiveProblem`] is the contract between the generic
//! evolutionary loop and a domain-specific problem.

use rand::Rng;

/// Defines a multi-objective optimization problem.
///
/// Users implement this trait to plug their domain logic into
/// [`Nsga2Runner`](super::Nsga2Runner). It covers:
///
/// 1. **Initialization**: How to create random individuals
/// 2. **Evaluation**: How to compute the objective vector
/// 3. **Crossover**: How to recombine two parents
/// 4. **Mutation**: How to perturb an individual
///
/// All objectives are **minimized**. Negate an objective to maximize it.
///
/// # Thread Safety
///
/// `MultiObjectiveProblem` must be `Send + Sync` because the runner may
/// evaluate individuals in parallel using rayon.
///
/// # Implementing
///
/// ```ignore
/// struct TwoBits;
///
/// impl MultiObjectiveProblem for TwoBits {
///     type Individual = Vec<bool>;
///     fn objective_count(&self) -> usize { 2 }
///     fn create_individual<R: Rng>(&self, rng: &mut R) -> Vec<bool> { random_bits(2, rng) }
///     fn evaluate(&self, ind: &Vec<bool>) -> Vec<f64> { ... }
/// }
/// ```
pub trait MultiObjectiveProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Clone + Send + Sync;

    /// Number of objectives returned by [`evaluate`](Self::evaluate).
    fn objective_count(&self) -> usize;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns one value per objective.
    ///
    /// The returned vector must have length [`objective_count`](Self::objective_count).
    fn evaluate(&self, individual: &Self::Individual) -> Vec<f64>;

    /// Recombines two parents in place, producing two offspring.
    ///
    /// The default implementation leaves both unchanged.
    fn crossover<R: Rng>(
        &self,
        _first: &mut Self::Individual,
        _second: &mut Self::Individual,
        _rng: &mut R,
    ) {
    }

    /// Mutates an individual in place.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}
}
