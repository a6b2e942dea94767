//! Data-center site selection toolkit.
//!
//! Ranks, selects and groups candidate locations for data centers:
//!
//! - **Scoring**: weighted sum of min-max normalized criteria, with
//!   benefit-type and cost-type attributes.
//! - **Gravity model**: attractiveness of a site (cost, efficiency,
//!   renewables) weighted by distance decay to demand points.
//! - **Selection**: binary site-selection models (capacity, latency, count
//!   caps, exactly-one) solved exactly by branch and bound, or through
//!   `good_lp` with the `milp` feature.
//! - **NSGA-II**: multi-objective genetic search over bit-vector
//!   individuals with non-dominated sorting and crowding distance.
//! - **Portfolio**: four-objective data-center subset search on top of
//!   NSGA-II, flattened into ranked per-facility rows.
//! - **Clustering**: k-means over site features and a persisted
//!   nearest-centroid predictor for planned facilities.
//! - **Scraping**: polite, sequential crawlers for a public data-center
//!   directory feeding the datasets above.
//!
//! # Architecture
//!
//! The library holds no global state. Every algorithm takes its inputs and
//! a configuration struct and returns a result value; randomness is seeded
//! through the configuration. The `dcsite` binary wires the modules to CSV
//! and TOML files and prints colored reports.

pub mod cluster;
pub mod config;
pub mod datasets;
mod error;
pub mod ga;
pub mod gravity;
pub mod io;
pub mod portfolio;
pub mod record;
pub mod report;
pub mod scoring;
pub mod scrape;
pub mod select;

pub use error::{Error, Result};
