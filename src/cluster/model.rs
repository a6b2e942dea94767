//! Persisted nearest-centroid cluster model.

use super::kmeans::{nearest, KMeans, KMeansFit};
use super::scaler::StandardScaler;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// A trained clustering: optional scaler, feature names and centroids in
/// (scaled) feature space.
///
/// Prediction assigns the label of the nearest centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterModel {
    pub feature_names: Vec<String>,
    pub scaler: Option<StandardScaler>,
    pub centroids: Vec<Vec<f64>>,
}

/// A trained model together with the assignment of its training rows.
#[derive(Debug, Clone)]
pub struct TrainedClusters {
    pub model: ClusterModel,
    pub fit: KMeansFit,
}

impl ClusterModel {
    /// Runs k-means over `data` and captures the result as a model.
    ///
    /// With `standardize` the features are fitted with a
    /// [`StandardScaler`] first and the centroids live in scaled space.
    pub fn train(
        feature_names: Vec<String>,
        data: &[Vec<f64>],
        kmeans: &KMeans,
        standardize: bool,
    ) -> Result<TrainedClusters> {
        if let Some(row) = data.first() {
            if row.len() != feature_names.len() {
                return Err(Error::DimensionMismatch {
                    expected: feature_names.len(),
                    actual: row.len(),
                    context: "feature names",
                });
            }
        }
        let (scaler, fit) = if standardize {
            let scaler = StandardScaler::fit(data)?;
            let scaled = scaler.transform_all(data)?;
            (Some(scaler), kmeans.fit(&scaled)?)
        } else {
            (None, kmeans.fit(data)?)
        };
        info!(
            k = kmeans.k,
            rows = data.len(),
            inertia = fit.inertia,
            "trained cluster model"
        );

        let model = ClusterModel {
            feature_names,
            scaler,
            centroids: fit.centroids.clone(),
        };
        Ok(TrainedClusters { model, fit })
    }

    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Cluster label of one feature row.
    pub fn predict(&self, features: &[f64]) -> Result<usize> {
        if features.len() != self.feature_names.len() {
            return Err(Error::DimensionMismatch {
                expected: self.feature_names.len(),
                actual: features.len(),
                context: "model input",
            });
        }
        if self.centroids.is_empty() {
            return Err(Error::InvalidModel("cluster model has no centroids".into()));
        }
        let point = match &self.scaler {
            Some(scaler) => scaler.transform(features)?,
            None => features.to_vec(),
        };
        Ok(nearest(&self.centroids, &point).0)
    }

    /// Writes the model as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| Error::io(path, e))
    }

    /// Reads a model written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let model: ClusterModel = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        let dim = self.feature_names.len();
        if self.centroids.is_empty() {
            return Err(Error::InvalidModel("cluster model has no centroids".into()));
        }
        if let Some(bad) = self.centroids.iter().find(|c| c.len() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
                context: "centroid",
            });
        }
        if let Some(scaler) = &self.scaler {
            if scaler.dim() != dim || scaler.scale.len() != dim {
                return Err(Error::InvalidModel("scaler does not match feature count".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{DatacenterFeatures, FEATURE_NAMES};
    use crate::record::tests::record;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_training_points_predict_own_label() {
        let data = vec![
            vec![1.0, 100.0],
            vec![1.2, 110.0],
            vec![9.0, 900.0],
            vec![9.5, 950.0],
        ];
        let trained =
            ClusterModel::train(names(&["a", "b"]), &data, &KMeans::new(2), true).unwrap();
        for (row, &label) in data.iter().zip(&trained.fit.labels) {
            assert_eq!(trained.model.predict(row).unwrap(), label);
        }
        assert_eq!(trained.model.k(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let data = vec![vec![0.0], vec![0.5], vec![10.0], vec![10.5]];
        let trained = ClusterModel::train(names(&["x"]), &data, &KMeans::new(2), false).unwrap();
        trained.model.save(&path).unwrap();

        let loaded = ClusterModel::load(&path).unwrap();
        assert_eq!(loaded, trained.model);
        assert_eq!(
            loaded.predict(&[0.2]).unwrap(),
            trained.model.predict(&[0.2]).unwrap()
        );
    }

    #[test]
    fn test_load_rejects_inconsistent_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"feature_names":["a","b"],"scaler":null,"centroids":[[1.0]]}"#,
        )
        .unwrap();
        assert!(ClusterModel::load(&path).is_err());
        assert!(ClusterModel::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_predict_dimension_checked() {
        let model = ClusterModel {
            feature_names: names(&["a", "b"]),
            scaler: None,
            centroids: vec![vec![0.0, 0.0]],
        };
        assert!(model.predict(&[1.0]).is_err());
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn test_datacenter_features_model() {
        let records = [
            record("A", 1.2, 4.0, 2000, 8),
            record("B", 1.3, 4.0, 2002, 7),
            record("C", 1.8, 0.0, 2023, 1),
            record("D", 1.9, 0.0, 2024, 2),
        ];
        let data: Vec<Vec<f64>> = records
            .iter()
            .map(|r| DatacenterFeatures::from_record(r).to_vector())
            .collect();
        let trained = ClusterModel::train(
            names(&FEATURE_NAMES),
            &data,
            &KMeans::new(2),
            true,
        )
        .unwrap();
        let l = &trained.fit.labels;
        assert_eq!(l[0], l[1]);
        assert_eq!(l[2], l[3]);
        assert_ne!(l[0], l[2]);
    }
}
