//! Selection models built from site tables.

use super::model::{Objective, SelectionModel};
use super::variables::BinaryVar;
use crate::error::Result;
use crate::record::SiteTable;
use serde::{Deserialize, Serialize};

/// Weights and limits of the capacity-constrained multi-site model.
///
/// Required table columns: `LandCost`, `EnergyCost`, `Renewable`,
/// `Latency`, `Capacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityWeights {
    /// Weight of land + build cost.
    pub cost: f64,
    /// Weight of energy spend (`energy_load · energy price`).
    pub energy: f64,
    /// Weight of renewable energy used (`energy_load · renewable share`).
    pub renewable: f64,
    /// Energy load assumed per selected site.
    pub energy_load: f64,
    /// Total power capacity (MW) the selection must provide.
    pub required_capacity: f64,
    /// A selected site must have latency at or below this (ms).
    pub max_latency_ms: f64,
    /// Maximum number of sites.
    pub max_sites: usize,
}

impl Default for CapacityWeights {
    fn default() -> Self {
        Self {
            cost: 1.0,
            energy: 0.1,
            renewable: 1.0,
            energy_load: 50.0,
            required_capacity: 150.0,
            max_latency_ms: 20.0,
            max_sites: 2,
        }
    }
}

/// Builds the capacity model:
///
/// ```text
/// min  Σ (w_cost · land_i + w_energy · load · price_i − w_renew · load · renew_i) · x_i
/// s.t. Σ capacity_i · x_i ≥ required
///      Σ_{latency_i ≤ max} x_i ≥ 1
///      Σ x_i ≤ max_sites
/// ```
///
/// # Example
///
/// ```
/// use dcsite::datasets::metro_sites;
/// use dcsite::select::{
///     capacity_model, BranchAndBoundSolver, CapacityWeights, SelectionSolver, SolverConfig,
/// };
///
/// let model = capacity_model(&metro_sites(), &CapacityWeights::default()).unwrap();
/// let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
/// assert_eq!(solution.selected, vec!["Mumbai", "Hyderabad"]);
/// ```
pub fn capacity_model(table: &SiteTable, w: &CapacityWeights) -> Result<SelectionModel> {
    let land = table.column("LandCost")?;
    let price = table.column("EnergyCost")?;
    let renewable = table.column("Renewable")?;
    let latency = table.column("Latency")?;
    let capacity = table.column("Capacity")?;
    let names = table.names();

    let mut model = SelectionModel::new("capacity");
    for name in &names {
        model.add_var(BinaryVar::new(*name));
    }

    let objective = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let coef = w.cost * land[i] + w.energy * w.energy_load * price[i]
                - w.renewable * renewable[i] * w.energy_load;
            (name.to_string(), coef)
        })
        .collect();
    model.set_objective(Objective::Minimize { terms: objective });

    let capacity_terms = names
        .iter()
        .zip(&capacity)
        .map(|(name, c)| (name.to_string(), *c))
        .collect();
    model.add_min_total("capacity", capacity_terms, w.required_capacity);

    let nearby: Vec<&str> = names
        .iter()
        .zip(&latency)
        .filter(|(_, l)| **l <= w.max_latency_ms)
        .map(|(name, _)| *name)
        .collect();
    model.add_at_least_one_of("latency", &nearby);
    model.add_at_most("site_count", w.max_sites);

    Ok(model)
}

/// Weights of the single-site placement model.
///
/// Required table columns: `Cost`, `Renewable`, `Connectivity`, `Risk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleSiteWeights {
    pub cost: f64,
    pub renewable: f64,
    pub connectivity: f64,
    pub risk: f64,
    /// Sites below this connectivity score cannot be chosen.
    pub min_connectivity: f64,
}

impl Default for SingleSiteWeights {
    fn default() -> Self {
        Self {
            cost: 1.0,
            renewable: 5.0,
            connectivity: 0.1,
            risk: 100.0,
            min_connectivity: 80.0,
        }
    }
}

/// Builds the single-site model:
///
/// ```text
/// min  Σ (w_cost · cost_i − w_ren · renew_i − w_conn · conn_i + w_risk · risk_i) · x_i
/// s.t. Σ x_i = 1
///      x_i = 0 for every site with connectivity below the threshold
/// ```
pub fn single_site_model(table: &SiteTable, w: &SingleSiteWeights) -> Result<SelectionModel> {
    let cost = table.column("Cost")?;
    let renewable = table.column("Renewable")?;
    let connectivity = table.column("Connectivity")?;
    let risk = table.column("Risk")?;
    let names = table.names();

    let mut model = SelectionModel::new("single_site");
    for name in &names {
        model.add_var(BinaryVar::new(*name));
    }

    let objective = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let coef = w.cost * cost[i] - w.renewable * renewable[i]
                - w.connectivity * connectivity[i]
                + w.risk * risk[i];
            (name.to_string(), coef)
        })
        .collect();
    model.set_objective(Objective::Minimize { terms: objective });
    model.add_exactly("select_one_site", 1);

    for (name, conn) in names.iter().zip(&connectivity) {
        if *conn < w.min_connectivity {
            model.forbid(name)?;
        }
    }

    Ok(model)
}
