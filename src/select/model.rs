//! Selection model definition.

use super::variables::BinaryVar;
use crate::error::{Error, Result};

/// Tolerance used when checking constraint satisfaction.
pub(crate) const FEASIBILITY_EPS: f64 = 1e-9;

/// Relation between the left-hand side and the right-hand side of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
}

/// A linear constraint `Σ a_i · x_i (<=|>=|==) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Constraint name, used in diagnostics.
    pub name: String,
    /// `(variable_name, coefficient)` pairs.
    pub terms: Vec<(String, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, terms: Vec<(String, f64)>, sense: Sense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            terms,
            sense,
            rhs,
        }
    }

    /// Whether `lhs` satisfies this row.
    pub fn holds(&self, lhs: f64) -> bool {
        match self.sense {
            Sense::Le => lhs <= self.rhs + FEASIBILITY_EPS,
            Sense::Ge => lhs >= self.rhs - FEASIBILITY_EPS,
            Sense::Eq => (lhs - self.rhs).abs() <= FEASIBILITY_EPS,
        }
    }
}

/// Objective function of the selection model.
#[derive(Debug, Clone, PartialEq)]
pub enum Objective {
    /// Minimize a linear combination of selection variables.
    Minimize {
        /// `(variable_name, coefficient)` pairs.
        terms: Vec<(String, f64)>,
    },

    /// Maximize a linear combination of selection variables.
    Maximize {
        /// `(variable_name, coefficient)` pairs.
        terms: Vec<(String, f64)>,
    },
}

impl Objective {
    pub fn terms(&self) -> &[(String, f64)] {
        match self {
            Objective::Minimize { terms } | Objective::Maximize { terms } => terms,
        }
    }

    pub fn is_maximize(&self) -> bool {
        matches!(self, Objective::Maximize { .. })
    }
}

/// A binary selection model.
///
/// Variables keep insertion order, which is also the order of
/// [`SelectionSolution::selected`](super::SelectionSolution::selected).
///
/// # Examples
///
/// ```
/// use dcsite::select::{BinaryVar, Objective, SelectionModel};
///
/// let mut model = SelectionModel::new("pick-one");
/// model.add_var(BinaryVar::new("A"));
/// model.add_var(BinaryVar::new("B"));
/// model.add_exactly("one-site", 1);
/// model.set_objective(Objective::Minimize {
///     terms: vec![("A".into(), 3.0), ("B".into(), 2.0)],
/// });
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SelectionModel {
    /// Model name.
    pub name: String,
    /// Decision variables.
    pub vars: Vec<BinaryVar>,
    /// Constraints.
    pub constraints: Vec<LinearConstraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl SelectionModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a decision variable, replacing any variable with the same name.
    pub fn add_var(&mut self, var: BinaryVar) {
        match self.vars.iter_mut().find(|v| v.name == var.name) {
            Some(existing) => *existing = var,
            None => self.vars.push(var),
        }
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: exactly `k` of the variables defined so far are selected.
    pub fn add_exactly(&mut self, name: impl Into<String>, k: usize) {
        let terms = self.all_ones();
        self.add_constraint(LinearConstraint::new(name, terms, Sense::Eq, k as f64));
    }

    /// Convenience: at most `k` of the variables defined so far are selected.
    pub fn add_at_most(&mut self, name: impl Into<String>, k: usize) {
        let terms = self.all_ones();
        self.add_constraint(LinearConstraint::new(name, terms, Sense::Le, k as f64));
    }

    /// Convenience: at least one of `vars` is selected.
    pub fn add_at_least_one_of(&mut self, name: impl Into<String>, vars: &[&str]) {
        let terms = vars.iter().map(|v| (v.to_string(), 1.0)).collect();
        self.add_constraint(LinearConstraint::new(name, terms, Sense::Ge, 1.0));
    }

    /// Convenience: `Σ coefficient · x >= rhs` (capacity, coverage).
    pub fn add_min_total(&mut self, name: impl Into<String>, terms: Vec<(String, f64)>, rhs: f64) {
        self.add_constraint(LinearConstraint::new(name, terms, Sense::Ge, rhs));
    }

    /// Fixes a variable to "not selected".
    pub fn forbid(&mut self, var: &str) -> Result<()> {
        let v = self
            .vars
            .iter_mut()
            .find(|v| v.name == var)
            .ok_or_else(|| Error::InvalidModel(format!("undefined variable: {var}")))?;
        v.fixed = Some(false);
        Ok(())
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Position of a variable.
    pub fn var_index(&self, name: &str) -> Option<usize> {
        self.vars.iter().position(|v| v.name == name)
    }

    /// Validates the model for consistency.
    ///
    /// Checks that all referenced variable names exist and that all
    /// coefficients and right-hand sides are finite.
    pub fn validate(&self) -> Result<()> {
        for (i, v) in self.vars.iter().enumerate() {
            if self.vars[..i].iter().any(|o| o.name == v.name) {
                return Err(Error::InvalidModel(format!("duplicate variable: {}", v.name)));
            }
        }
        for c in &self.constraints {
            if !c.rhs.is_finite() {
                return Err(Error::InvalidModel(format!("{}: non-finite rhs", c.name)));
            }
            self.check_terms(&c.terms, &c.name)?;
        }
        if let Some(obj) = &self.objective {
            self.check_terms(obj.terms(), "objective")?;
        }
        Ok(())
    }

    fn check_terms(&self, terms: &[(String, f64)], owner: &str) -> Result<()> {
        for (name, coef) in terms {
            if self.var_index(name).is_none() {
                return Err(Error::InvalidModel(format!("{owner}: undefined variable: {name}")));
            }
            if !coef.is_finite() {
                return Err(Error::InvalidModel(format!(
                    "{owner}: non-finite coefficient for {name}"
                )));
            }
        }
        Ok(())
    }

    /// Returns the number of decision variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Whether `values` (one per variable, in model order) respects every
    /// fixed variable and constraint.
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        if values.len() != self.vars.len() {
            return false;
        }
        let fixed_ok = self
            .vars
            .iter()
            .zip(values)
            .all(|(v, &x)| v.fixed.map_or(true, |f| f == x));
        fixed_ok
            && self
                .constraints
                .iter()
                .all(|c| c.holds(self.linear_value(&c.terms, values)))
    }

    /// Objective value of `values` (0 when there is no objective).
    pub fn objective_value(&self, values: &[bool]) -> f64 {
        self.objective
            .as_ref()
            .map(|o| self.linear_value(o.terms(), values))
            .unwrap_or(0.0)
    }

    fn linear_value(&self, terms: &[(String, f64)], values: &[bool]) -> f64 {
        terms
            .iter()
            .filter_map(|(name, coef)| {
                let i = self.var_index(name)?;
                values.get(i).map(|&x| if x { *coef } else { 0.0 })
            })
            .sum()
    }

    fn all_ones(&self) -> Vec<(String, f64)> {
        self.vars.iter().map(|v| (v.name.clone(), 1.0)).collect()
    }
}
