//! Gravity (attractiveness × distance decay) site model.
//!
//! Every candidate site has an intrinsic attractiveness built from its cost,
//! energy efficiency and renewable availability. Demand points pull on
//! candidates with a force that decays with distance. The product of the
//! two is the optimality score; the best site maximizes it.
//!
//! ```text
//! A_j = θ1 / cost_j + θ2 · eff_j + θ3 · re_j
//! D_j = Σ_i B_i · d_ij^(-λ)
//! S_j = A_j · D_j
//! ```
//!
//! # References
//!
//! - Huff (1964), "Defining and Estimating a Trading Area"
//! - Reilly (1931), *The Law of Retail Gravitation*

mod model;

pub use model::{Candidate, DemandPoint, GravityInput, GravityModel, GravityParams, GravityScore};
