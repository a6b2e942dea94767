//! Weighted min-max scoring.
//!
//! Each attribute is min-max normalized to `[0, 1]` with its direction
//! (benefit: higher is better, cost: lower is better) and the normalized
//! values are combined in a weighted sum. The result is a composite
//! attraction score per site; higher is more attractive.
//!
//! # Key Types
//!
//! - [`Criterion`]: attribute name, weight and [`Direction`]
//! - [`WeightedScorer`]: validated criterion set, scores a [`SiteTable`](crate::record::SiteTable)
//! - [`ScoredSite`]: one ranked result row
//!
//! # References
//!
//! - Triantaphyllou (2000), *Multi-Criteria Decision Making Methods: A Comparative Study*

mod normalize;
mod scorer;

pub use normalize::{min_max, normalize};
pub use scorer::{Criterion, Direction, ScoredSite, WeightedScorer};
