//! Binary site-selection optimization.
//!
//! A modeling layer for choosing a subset of candidate sites: one binary
//! decision variable per site, linear constraints over those variables
//! (count caps, exactly-one, capacity and threshold rows) and a linear
//! weighted objective.
//!
//! # Key Components
//!
//! - **Variables**: [`BinaryVar`]: select / do not select, optionally fixed
//! - **Constraints**: [`LinearConstraint`] with a [`Sense`]
//! - **Model**: [`SelectionModel`]: container for variables, constraints, objective
//! - **Solver**: [`SelectionSolver`] trait: interface for solver implementations
//! - **Models from tables**: [`capacity_model`], [`single_site_model`]
//!
//! # Solvers
//!
//! - [`BranchAndBoundSolver`]: exact depth-first branch and bound with
//!   constraint-slack and objective-bound pruning. Intended for the tens of
//!   candidates site selection deals with.
//! - `MilpSolver` (feature `milp`): hands the model to `good_lp` with the
//!   pure-Rust `microlp` backend.
//!
//! Infeasible models are reported as [`SolverStatus::Infeasible`] rather
//! than an empty selection.
//!
//! # References
//!
//! Wolsey (1998), *Integer Programming*

#[cfg(feature = "milp")]
mod milp;
mod model;
mod presets;
mod solver;
mod variables;

#[cfg(feature = "milp")]
pub use milp::MilpSolver;
pub use model::{LinearConstraint, Objective, SelectionModel, Sense};
pub use presets::{capacity_model, single_site_model, CapacityWeights, SingleSiteWeights};
pub use solver::{
    BranchAndBoundSolver, SelectionSolution, SelectionSolver, SolverConfig, SolverStatus,
};
pub use variables::BinaryVar;
