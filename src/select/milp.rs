//! `good_lp` backend for selection models.

use super::model::{SelectionModel, Sense};
use super::solver::{SelectionSolution, SelectionSolver, SolverConfig, SolverStatus};
use good_lp::{
    constraint, default_solver, variable, variables, Expression, ResolutionError, Solution,
    SolverModel, Variable,
};
use std::time::Instant;
use tracing::{debug, warn};

/// Solves selection models with the default `good_lp` solver.
///
/// The time and node limits of [`SolverConfig`] are not forwarded; the
/// external solver always runs to completion and reports `Optimal`.
pub struct MilpSolver;

impl MilpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MilpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionSolver for MilpSolver {
    fn solve(&self, model: &SelectionModel, _config: &SolverConfig) -> SelectionSolution {
        if let Err(e) = model.validate() {
            debug!(model = %model.name, error = %e, "rejecting invalid selection model");
            return SelectionSolution::empty(SolverStatus::ModelInvalid);
        }
        let start_time = Instant::now();

        let mut vars = variables!();
        let xs: Vec<Variable> = model
            .vars
            .iter()
            .map(|v| match v.fixed {
                Some(x) => {
                    let value = if x { 1.0 } else { 0.0 };
                    vars.add(variable().integer().min(value).max(value))
                }
                None => vars.add(variable().binary()),
            })
            .collect();

        let linear = |terms: &[(String, f64)]| {
            terms.iter().fold(Expression::from(0.0), |acc, (name, coef)| {
                match model.var_index(name) {
                    Some(i) => acc + *coef * xs[i],
                    None => acc,
                }
            })
        };

        let objective = model
            .objective
            .as_ref()
            .map(|o| linear(o.terms()))
            .unwrap_or_else(|| Expression::from(0.0));
        let mut problem = match &model.objective {
            Some(o) if o.is_maximize() => vars.maximise(objective).using(default_solver),
            _ => vars.minimise(objective).using(default_solver),
        };

        for c in &model.constraints {
            let lhs = linear(&c.terms);
            let rhs = c.rhs;
            problem = match c.sense {
                Sense::Le => problem.with(constraint!(lhs <= rhs)),
                Sense::Ge => problem.with(constraint!(lhs >= rhs)),
                Sense::Eq => problem.with(constraint!(lhs == rhs)),
            };
        }

        let mut solution = match problem.solve() {
            Ok(solved) => {
                let values: Vec<bool> = xs.iter().map(|x| solved.value(*x) > 0.5).collect();
                SelectionSolution::from_values(model, SolverStatus::Optimal, &values)
            }
            Err(ResolutionError::Infeasible) => SelectionSolution::empty(SolverStatus::Infeasible),
            Err(e) => {
                warn!(model = %model.name, error = %e, "milp solver failed");
                SelectionSolution::empty(SolverStatus::ModelInvalid)
            }
        };
        solution.solve_time_ms = start_time.elapsed().as_millis() as u64;
        solution
    }
}
