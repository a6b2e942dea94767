//! Portfolio selection as a four-objective NSGA-II problem.

use crate::error::{Error, Result};
use crate::ga::operators::{flip_bit_mutation, random_bits, two_point_crossover};
use crate::ga::{MultiObjectiveProblem, Nsga2Config, Nsga2Result, Nsga2Runner};
use crate::record::{DatacenterRecord, DEFAULT_REFERENCE_YEAR};
use rand::Rng;
use tracing::info;

/// Objective value assigned to every objective when a selection contains
/// no eligible facility.
pub const INFEASIBLE_PENALTY: f64 = 99_999.0;

/// Per-bit flip probability used by the default mutation.
pub const DEFAULT_FLIP_PROBABILITY: f64 = 0.05;

/// Chooses a subset of data centers.
///
/// An individual is one bit per record. Only selected records that pass
/// [`DatacenterRecord::is_eligible`] count toward the objectives:
///
/// | # | objective | sense |
/// |---|-----------|-------|
/// | 1 | Σ PUE | minimize |
/// | 2 | −Σ IXP count | minimize (maximize IXPs) |
/// | 3 | −Σ service score | minimize (maximize services) |
/// | 4 | mean facility age | minimize |
///
/// A selection with no eligible record scores [`INFEASIBLE_PENALTY`] on all
/// four objectives.
#[derive(Debug, Clone)]
pub struct PortfolioProblem<'a> {
    records: &'a [DatacenterRecord],
    reference_year: i32,
    flip_probability: f64,
}

impl<'a> PortfolioProblem<'a> {
    /// Creates the problem over `records`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidValue`] when `records` is empty.
    pub fn new(records: &'a [DatacenterRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::invalid_value("records", "portfolio needs at least one record"));
        }
        Ok(Self {
            records,
            reference_year: DEFAULT_REFERENCE_YEAR,
            flip_probability: DEFAULT_FLIP_PROBABILITY,
        })
    }

    /// Sets the year facility age is measured against.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Sets the per-bit flip probability of the mutation operator.
    pub fn with_flip_probability(mut self, p: f64) -> Self {
        self.flip_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn records(&self) -> &[DatacenterRecord] {
        self.records
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Records selected by `mask`, eligible or not.
    pub fn selected<'m>(
        &'m self,
        mask: &'m [bool],
    ) -> impl Iterator<Item = &'a DatacenterRecord> + 'm {
        self.records
            .iter()
            .zip(mask)
            .filter(|(_, &on)| on)
            .map(|(r, _)| r)
    }

    /// Runs NSGA-II with `config`.
    pub fn optimize(&self, config: &Nsga2Config) -> Result<Nsga2Result<Vec<bool>>> {
        let result = Nsga2Runner::run(self, config)?;
        info!(
            records = self.records.len(),
            generations = result.generations,
            front = result.pareto_front.len(),
            "portfolio search finished"
        );
        Ok(result)
    }
}

impl MultiObjectiveProblem for PortfolioProblem<'_> {
    type Individual = Vec<bool>;

    fn objective_count(&self) -> usize {
        4
    }

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
        random_bits(self.records.len(), rng)
    }

    fn evaluate(&self, mask: &Vec<bool>) -> Vec<f64> {
        let mut count = 0usize;
        let (mut pue, mut ixp, mut service, mut age) = (0.0, 0.0, 0.0, 0.0);
        for record in self.selected(mask).filter(|r| r.is_eligible()) {
            count += 1;
            pue += record.pue;
            ixp += record.ixp_count;
            service += f64::from(record.service_score());
            age += f64::from(record.facility_age(self.reference_year));
        }
        if count == 0 {
            return vec![INFEASIBLE_PENALTY; 4];
        }
        vec![pue, -ixp, -service, age / count as f64]
    }

    fn crossover<R: Rng>(&self, first: &mut Vec<bool>, second: &mut Vec<bool>, rng: &mut R) {
        two_point_crossover(first, second, rng);
    }

    fn mutate<R: Rng>(&self, mask: &mut Vec<bool>, rng: &mut R) {
        flip_bit_mutation(mask, self.flip_probability, rng);
    }
}
