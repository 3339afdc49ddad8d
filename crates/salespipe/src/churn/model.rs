//! The fitted churn model and its persistence.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::features::CHURN_FEATURES;
use crate::error::{Result, SalespipeError};

/// Decision threshold on the churn probability.
const CHURN_THRESHOLD: f64 = 0.5;

/// A fitted logistic-regression churn classifier.
///
/// Inputs are standardized with the training-set means and standard
/// deviations stored alongside the weights, so a saved model scores new
/// observations without access to the training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnModel {
    /// Feature names, in input order.
    pub feature_names: Vec<String>,
    /// One weight per feature, over standardized inputs.
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Per-feature training means.
    pub means: Vec<f64>,
    /// Per-feature training standard deviations.
    pub stds: Vec<f64>,
    /// Accuracy on the held-out split at training time.
    pub holdout_accuracy: f64,
    pub trained_at: DateTime<Utc>,
}

/// Result of scoring one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChurnPrediction {
    /// True when the churn probability reaches the decision threshold.
    pub churned: bool,
    /// Churn probability, rounded to 2 decimal places.
    pub probability: f64,
}

impl ChurnModel {
    /// Churn probability for one feature vector, before rounding.
    pub fn predict_probability(&self, features: &[f64; 4]) -> f64 {
        let mut z = self.bias;
        for (i, &x) in features.iter().enumerate() {
            z += self.weights[i] * self.standardize(i, x);
        }
        sigmoid(z)
    }

    /// Score one feature vector.
    pub fn predict(&self, features: &[f64; 4]) -> ChurnPrediction {
        let probability = self.predict_probability(features);
        ChurnPrediction {
            churned: probability >= CHURN_THRESHOLD,
            probability: round2(probability),
        }
    }

    pub(crate) fn standardize(&self, index: usize, value: f64) -> f64 {
        if self.stds[index] == 0.0 {
            0.0
        } else {
            (value - self.means[index]) / self.stds[index]
        }
    }

    /// Save the model to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SalespipeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load a model from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SalespipeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);
        let model: ChurnModel = serde_json::from_reader(reader)?;

        // The scorer indexes a fixed-arity feature vector, so every
        // parallel array must have exactly that length.
        let arity = CHURN_FEATURES.len();
        if model.feature_names.len() != arity
            || model.weights.len() != arity
            || model.means.len() != arity
            || model.stds.len() != arity
        {
            return Err(SalespipeError::Model(format!(
                "inconsistent model file '{}': expected {} features, found {} names / {} weights",
                path.display(),
                arity,
                model.feature_names.len(),
                model.weights.len()
            )));
        }

        Ok(model)
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
