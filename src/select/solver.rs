//! Selection solver interface and exact branch-and-bound implementation.

use super::model::{SelectionModel, Sense, FEASIBILITY_EPS};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Time or node limit reached. The best assignment found so far, if
    /// any, is still reported.
    Timeout,
}

/// Solution from a selection solver.
#[derive(Debug, Clone)]
pub struct SelectionSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value in the model's own sense (if any).
    pub objective_value: Option<f64>,
    /// Variable assignments.
    pub assignments: HashMap<String, bool>,
    /// Names of the selected variables, in model order.
    pub selected: Vec<String>,
    /// Search nodes explored (0 for external solvers).
    pub nodes: u64,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl SelectionSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            assignments: HashMap::new(),
            selected: Vec::new(),
            nodes: 0,
            solve_time_ms: 0,
        }
    }

    /// Builds a solution from one value per model variable.
    pub(crate) fn from_values(
        model: &SelectionModel,
        status: SolverStatus,
        values: &[bool],
    ) -> Self {
        let assignments = model
            .vars
            .iter()
            .zip(values)
            .map(|(v, &x)| (v.name.clone(), x))
            .collect();
        let selected = model
            .vars
            .iter()
            .zip(values)
            .filter(|(_, &x)| x)
            .map(|(v, _)| v.name.clone())
            .collect();
        Self {
            status,
            objective_value: model.objective.as_ref().map(|_| model.objective_value(values)),
            assignments,
            selected,
            nodes: 0,
            solve_time_ms: 0,
        }
    }

    /// Whether a feasible assignment was found, optimal or not.
    pub fn is_solution_found(&self) -> bool {
        match self.status {
            SolverStatus::Optimal => true,
            SolverStatus::Timeout => !self.assignments.is_empty(),
            SolverStatus::Infeasible | SolverStatus::ModelInvalid => false,
        }
    }

    /// Whether the named variable is selected.
    pub fn is_selected(&self, name: &str) -> bool {
        self.assignments.get(name).copied().unwrap_or(false)
    }

    /// Assignment as one value per model variable.
    pub fn values(&self, model: &SelectionModel) -> Vec<bool> {
        model.vars.iter().map(|v| self.is_selected(&v.name)).collect()
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: u64,
    /// Maximum number of search nodes (`None` = unlimited).
    pub node_limit: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            node_limit: None,
        }
    }
}

/// Trait for selection solver implementations.
///
/// Implementors provide the actual search. This can wrap external MILP
/// solvers or provide exact enumeration for small candidate sets.
pub trait SelectionSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &SelectionModel, config: &SolverConfig) -> SelectionSolution;
}

/// Exact depth-first branch and bound over the binary variables.
///
/// At every node the solver checks, for each constraint, whether the row
/// can still be satisfied given the best and worst contribution of the
/// unassigned variables, and whether the objective can still beat the
/// incumbent. Variables are branched in model order, trying first the value
/// that lowers the objective.
///
/// # Limitations
///
/// - Exponential in the worst case; meant for tens of candidates
/// - Single-threaded
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionSolver for BranchAndBoundSolver {
    fn solve(&self, model: &SelectionModel, config: &SolverConfig) -> SelectionSolution {
        if let Err(e) = model.validate() {
            debug!(model = %model.name, error = %e, "rejecting invalid selection model");
            return SelectionSolution::empty(SolverStatus::ModelInvalid);
        }

        let start_time = Instant::now();
        let dense = DenseModel::compile(model);
        let mut search = Search {
            dense: &dense,
            values: vec![false; dense.n],
            lhs: vec![0.0; dense.rows.len()],
            cost: 0.0,
            best: None,
            nodes: 0,
            deadline: start_time.checked_add(Duration::from_millis(config.time_limit_ms)),
            node_limit: config.node_limit,
            aborted: false,
        };
        search.dfs(0);

        let status = match (&search.best, search.aborted) {
            (_, true) => SolverStatus::Timeout,
            (Some(_), false) => SolverStatus::Optimal,
            (None, false) => SolverStatus::Infeasible,
        };

        let mut solution = match &search.best {
            Some((_, values)) => SelectionSolution::from_values(model, status, values),
            None => SelectionSolution::empty(status),
        };
        solution.nodes = search.nodes;
        solution.solve_time_ms = start_time.elapsed().as_millis() as u64;

        debug!(
            model = %model.name,
            status = ?solution.status,
            nodes = solution.nodes,
            objective = ?solution.objective_value,
            "branch and bound finished"
        );
        solution
    }
}

/// A constraint row in dense form.
struct Row {
    coef: Vec<f64>,
    sense: Sense,
    rhs: f64,
    /// `suffix_min[i]`: smallest possible contribution of variables `i..`.
    suffix_min: Vec<f64>,
    /// `suffix_max[i]`: largest possible contribution of variables `i..`.
    suffix_max: Vec<f64>,
}

/// Index-based view of a validated model; the objective is always minimized.
struct DenseModel {
    n: usize,
    domains: Vec<&'static [bool]>,
    rows: Vec<Row>,
    cost: Vec<f64>,
    cost_suffix_min: Vec<f64>,
}

impl DenseModel {
    fn compile(model: &SelectionModel) -> Self {
        let n = model.vars.len();
        let domains: Vec<&'static [bool]> = model.vars.iter().map(|v| v.domain()).collect();

        let densify = |terms: &[(String, f64)]| {
            let mut coef = vec![0.0f64; n];
            for (name, c) in terms {
                if let Some(i) = model.var_index(name) {
                    coef[i] += *c;
                }
            }
            coef
        };

        let suffix = |coef: &[f64], pick: fn(f64, f64) -> f64| {
            let mut out = vec![0.0f64; n + 1];
            for i in (0..n).rev() {
                let best = domains[i]
                    .iter()
                    .map(|&x| if x { coef[i] } else { 0.0 })
                    .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| pick(a, v))))
                    .unwrap_or(0.0);
                out[i] = out[i + 1] + best;
            }
            out
        };

        let rows = model
            .constraints
            .iter()
            .map(|c| {
                let coef = densify(&c.terms);
                let suffix_min = suffix(&coef, f64::min);
                let suffix_max = suffix(&coef, f64::max);
                Row {
                    coef,
                    sense: c.sense,
                    rhs: c.rhs,
                    suffix_min,
                    suffix_max,
                }
            })
            .collect();

        let cost: Vec<f64> = match &model.objective {
            Some(obj) => {
                let sign = if obj.is_maximize() { -1.0 } else { 1.0 };
                densify(obj.terms()).into_iter().map(|c| sign * c).collect()
            }
            None => vec![0.0; n],
        };
        let cost_suffix_min = suffix(&cost, f64::min);

        Self {
            n,
            domains,
            rows,
            cost,
            cost_suffix_min,
        }
    }
}

struct Search<'a> {
    dense: &'a DenseModel,
    values: Vec<bool>,
    lhs: Vec<f64>,
    cost: f64,
    best: Option<(f64, Vec<bool>)>,
    nodes: u64,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    aborted: bool,
}

impl Search<'_> {
    fn dfs(&mut self, i: usize) {
        if self.aborted {
            return;
        }
        self.nodes += 1;
        if self.node_limit.is_some_and(|limit| self.nodes > limit)
            || (self.nodes % 1024 == 0 && self.deadline.is_some_and(|d| Instant::now() >= d))
        {
            self.aborted = true;
            return;
        }

        if !self.rows_reachable(i) {
            return;
        }
        if let Some((best_cost, _)) = &self.best {
            if self.cost + self.dense.cost_suffix_min[i] >= *best_cost - FEASIBILITY_EPS {
                return;
            }
        }

        if i == self.dense.n {
            self.best = Some((self.cost, self.values.clone()));
            return;
        }

        let prefer_one = self.dense.cost[i] < 0.0;
        let domain = self.dense.domains[i];
        let order: [bool; 2] = if prefer_one { [true, false] } else { [false, true] };
        for x in order.into_iter().filter(|x| domain.contains(x)) {
            self.assign(i, x, 1.0);
            self.dfs(i + 1);
            self.assign(i, x, -1.0);
        }
    }

    /// Applies (`dir = 1`) or undoes (`dir = -1`) `x_i = x`.
    fn assign(&mut self, i: usize, x: bool, dir: f64) {
        self.values[i] = x && dir > 0.0;
        if !x {
            return;
        }
        for (r, row) in self.dense.rows.iter().enumerate() {
            self.lhs[r] += dir * row.coef[i];
        }
        self.cost += dir * self.dense.cost[i];
    }

    /// Whether every row can still be satisfied with variables `i..` free.
    fn rows_reachable(&self, i: usize) -> bool {
        self.dense.rows.iter().zip(&self.lhs).all(|(row, &lhs)| {
            let lo = lhs + row.suffix_min[i];
            let hi = lhs + row.suffix_max[i];
            match row.sense {
                Sense::Le => lo <= row.rhs + FEASIBILITY_EPS,
                Sense::Ge => hi >= row.rhs - FEASIBILITY_EPS,
                Sense::Eq => {
                    lo <= row.rhs + FEASIBILITY_EPS && hi >= row.rhs - FEASIBILITY_EPS
                }
            }
        })
    }
}
