//! NSGA-II multi-objective evolutionary search.
//!
//! A generic, domain-agnostic engine built on a trait-based abstraction.
//! Users define their problem by implementing [`MultiObjectiveProblem`],
//! which specifies how to create, evaluate, recombine and mutate
//! individuals. Every objective is minimized.
//!
//! # Key Types
//!
//! - [`Nsga2Config`]: Algorithm parameters (population size, rates, seed)
//! - [`Nsga2Runner`]: Executes the evolutionary loop
//! - [`Nsga2Result`]: Final population, objective vectors and Pareto front
//!
//! # Submodules
//!
//! - [`operators`]: Bit-vector two-point crossover and flip-bit mutation
//! - [`multi_objective`]: Dominance, non-dominated sorting and crowding distance
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod multi_objective;
pub mod operators;
mod runner;
mod types;

pub use config::Nsga2Config;
pub use runner::{Nsga2Result, Nsga2Runner};
pub use types::MultiObjectiveProblem;
