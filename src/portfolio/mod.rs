//! Data-center portfolio search.
//!
//! Selects subsets of data centers with NSGA-II against four objectives
//! (total PUE, total IXP count, total service score, mean facility age),
//! then flattens the Pareto-optimal subsets into per-facility rows and
//! ranks them with a weighted, min-max normalized score.
//!
//! # Example
//!
//! ```no_run
//! use dcsite::ga::Nsga2Config;
//! use dcsite::portfolio::{aggregate, score_rows, PortfolioProblem, PortfolioWeights};
//!
//! # fn demo(records: Vec<dcsite::record::DatacenterRecord>) -> dcsite::Result<()> {
//! let problem = PortfolioProblem::new(&records)?;
//! let result = problem.optimize(&Nsga2Config::default())?;
//! let mut rows = aggregate(&problem, result.front().map(|(mask, _)| mask));
//! score_rows(&mut rows, &PortfolioWeights::default());
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod problem;

pub use aggregate::{aggregate, score_rows, weighted_scores, PortfolioRow, PortfolioWeights};
pub use problem::{PortfolioProblem, DEFAULT_FLIP_PROBABILITY, INFEASIBLE_PENALTY};
