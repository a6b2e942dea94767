//! Clustering of candidate sites and data centers.
//!
//! K-means groups sites by a chosen feature subset (or all features). A
//! trained clustering is captured as a [`ClusterModel`] (scaler, feature
//! names, centroids) that can be saved as JSON and used to place a new,
//! planned data center into one of the learned groups.
//!
//! # Key Types
//!
//! - [`StandardScaler`]: zero-mean, unit-variance feature scaling
//! - [`KMeans`]: k-means++ seeded Lloyd iterations with restarts
//! - [`ClusterModel`]: nearest-centroid predictor with JSON persistence
//! - [`DatacenterFeatures`]: the 14 validated inputs of the predictor
//!
//! # References
//!
//! - Lloyd (1982), "Least squares quantization in PCM"
//! - Arthur & Vassilvitskii (2007), "k-means++: The Advantages of Careful Seeding"

mod features;
mod kmeans;
mod model;
mod scaler;

pub use features::{DatacenterFeatures, FEATURE_NAMES};
pub use kmeans::{KMeans, KMeansFit};
pub use model::{ClusterModel, TrainedClusters};
pub use scaler::StandardScaler;
