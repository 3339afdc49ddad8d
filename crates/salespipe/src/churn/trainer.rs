//! Training: fetch labeled observations and fit the classifier.

use chrono::Utc;
use log::{info, warn};
use sqlx::{Row, SqlitePool};

use super::features::{CHURN_FEATURES, ChurnObservation, ContractTerm};
use super::model::{ChurnModel, sigmoid};
use crate::error::{Result, SalespipeError};
use crate::load::validate_table_name;

/// Configuration for one training run.
///
/// Passed in explicitly; the database connection is owned by the caller
/// and nothing outlives the run.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Table holding the labeled feature rows.
    pub feature_table: String,
    /// Fraction of rows held out for accuracy measurement.
    pub test_fraction: f64,
    /// Seed for the train/test shuffle. Fixed seed makes runs
    /// reproducible.
    pub seed: u64,
    /// Full-batch gradient descent epochs.
    pub epochs: usize,
    pub learning_rate: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            feature_table: "customers".to_string(),
            test_fraction: 0.2,
            seed: 42,
            epochs: 500,
            learning_rate: 0.5,
        }
    }
}

/// Summary of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    /// Rows returned by the feature query.
    pub rows_read: usize,
    /// Rows dropped for an unparseable contract or label.
    pub rows_skipped: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Accuracy on the held-out split.
    pub holdout_accuracy: f64,
}

/// Read labeled observations from the feature table.
///
/// `TotalCharges` is stored as text in the source data; unparseable text
/// is coerced to 0.0, while values that are neither text nor numeric
/// surface as a database error. Rows whose contract term or churn label
/// does not parse are skipped and counted, never silently re-encoded.
pub async fn fetch_observations(
    pool: &SqlitePool,
    table: &str,
) -> Result<(Vec<ChurnObservation>, usize)> {
    validate_table_name(table)?;

    let rows = sqlx::query(&format!(
        "SELECT tenure, MonthlyCharges, TotalCharges, Contract, Churn FROM {table}"
    ))
    .fetch_all(pool)
    .await?;

    let mut observations = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for row in &rows {
        let tenure: i64 = row.try_get("tenure")?;
        let monthly_charges: f64 = row.try_get("MonthlyCharges")?;

        // TEXT in the source schema; tolerate REAL as well. Only the
        // text-parse failure coerces to 0.0 — a value that is neither
        // text nor a number is a database error, not a blank.
        let total_charges = match row.try_get::<String, _>("TotalCharges") {
            Ok(raw) => raw.trim().parse::<f64>().unwrap_or(0.0),
            Err(_) => row.try_get::<f64, _>("TotalCharges")?,
        };

        let contract_raw: String = row.try_get("Contract")?;
        let contract = match contract_raw.parse::<ContractTerm>() {
            Ok(term) => term,
            Err(e) => {
                warn!("skipping training row: {}", e);
                skipped += 1;
                continue;
            }
        };

        let churn_raw: String = row.try_get("Churn")?;
        let churned = match churn_raw.trim() {
            "Yes" => true,
            "No" => false,
            other => {
                warn!("skipping training row: unknown churn label '{}'", other);
                skipped += 1;
                continue;
            }
        };

        observations.push(ChurnObservation {
            tenure: tenure as f64,
            monthly_charges,
            total_charges,
            contract,
            churned,
        });
    }

    Ok((observations, skipped))
}

/// Fetch observations and fit a model in one pass.
pub async fn train_from_database(
    pool: &SqlitePool,
    config: &TrainingConfig,
) -> Result<(ChurnModel, TrainingSummary)> {
    let (observations, skipped) = fetch_observations(pool, &config.feature_table).await?;
    let rows_read = observations.len() + skipped;

    let (model, mut summary) = train(&observations, config)?;
    summary.rows_read = rows_read;
    summary.rows_skipped = skipped;

    Ok((model, summary))
}

/// Fit a logistic-regression classifier on the given observations.
///
/// Deterministic for a fixed seed: the shuffle, the split, and the
/// full-batch gradient updates all depend only on the input and the
/// config.
pub fn train(
    observations: &[ChurnObservation],
    config: &TrainingConfig,
) -> Result<(ChurnModel, TrainingSummary)> {
    if observations.len() < 4 {
        return Err(SalespipeError::Model(format!(
            "not enough training rows: {} (need at least 4)",
            observations.len()
        )));
    }
    if !(0.0..1.0).contains(&config.test_fraction) {
        return Err(SalespipeError::Config(format!(
            "test_fraction must be in [0, 1): {}",
            config.test_fraction
        )));
    }

    let (train_set, test_set) = split(observations, config);

    // Standardize with training-split statistics only.
    let (means, stds) = feature_statistics(&train_set);
    let standardized: Vec<[f64; 4]> = train_set
        .iter()
        .map(|obs| {
            let raw = obs.features();
            std::array::from_fn(|i| {
                if stds[i] == 0.0 {
                    0.0
                } else {
                    (raw[i] - means[i]) / stds[i]
                }
            })
        })
        .collect();
    let labels: Vec<f64> = train_set
        .iter()
        .map(|obs| if obs.churned { 1.0 } else { 0.0 })
        .collect();

    let mut weights = [0.0f64; 4];
    let mut bias = 0.0f64;
    let n = standardized.len() as f64;

    for _ in 0..config.epochs {
        let mut weight_grads = [0.0f64; 4];
        let mut bias_grad = 0.0f64;

        for (x, &y) in standardized.iter().zip(&labels) {
            let mut z = bias;
            for i in 0..4 {
                z += weights[i] * x[i];
            }
            let error = sigmoid(z) - y;
            for i in 0..4 {
                weight_grads[i] += error * x[i];
            }
            bias_grad += error;
        }

        for i in 0..4 {
            weights[i] -= config.learning_rate * weight_grads[i] / n;
        }
        bias -= config.learning_rate * bias_grad / n;
    }

    let model = ChurnModel {
        feature_names: CHURN_FEATURES.iter().map(|s| s.to_string()).collect(),
        weights: weights.to_vec(),
        bias,
        means: means.to_vec(),
        stds: stds.to_vec(),
        holdout_accuracy: 0.0,
        trained_at: Utc::now(),
    };

    let holdout_accuracy = accuracy(&model, &test_set);
    let model = ChurnModel {
        holdout_accuracy,
        ..model
    };

    info!(
        "trained churn model: {} train rows, {} test rows, holdout accuracy {:.3}",
        train_set.len(),
        test_set.len(),
        holdout_accuracy
    );

    let summary = TrainingSummary {
        rows_read: observations.len(),
        rows_skipped: 0,
        train_rows: train_set.len(),
        test_rows: test_set.len(),
        holdout_accuracy,
    };

    Ok((model, summary))
}

/// Seeded shuffle and split. The test split always gets at least one row
/// and never all of them.
fn split(
    observations: &[ChurnObservation],
    config: &TrainingConfig,
) -> (Vec<ChurnObservation>, Vec<ChurnObservation>) {
    let mut rng = fastrand::Rng::with_seed(config.seed);
    let mut indices: Vec<usize> = (0..observations.len()).collect();
    rng.shuffle(&mut indices);

    let n = observations.len();
    let test_len = ((n as f64) * config.test_fraction).round() as usize;
    let test_len = test_len.clamp(1, n - 1);

    let test = indices[..test_len]
        .iter()
        .map(|&i| observations[i].clone())
        .collect();
    let train = indices[test_len..]
        .iter()
        .map(|&i| observations[i].clone())
        .collect();

    (train, test)
}

fn feature_statistics(observations: &[ChurnObservation]) -> ([f64; 4], [f64; 4]) {
    let n = observations.len() as f64;
    let mut means = [0.0f64; 4];
    for obs in observations {
        let raw = obs.features();
        for i in 0..4 {
            means[i] += raw[i];
        }
    }
    for mean in &mut means {
        *mean /= n;
    }

    let mut stds = [0.0f64; 4];
    for obs in observations {
        let raw = obs.features();
        for i in 0..4 {
            stds[i] += (raw[i] - means[i]).powi(2);
        }
    }
    for std in &mut stds {
        *std = (*std / n).sqrt();
    }

    (means, stds)
}

fn accuracy(model: &ChurnModel, observations: &[ChurnObservation]) -> f64 {
    if observations.is_empty() {
        return 0.0;
    }
    let correct = observations
        .iter()
        .filter(|obs| {
            let predicted = model.predict_probability(&obs.features()) >= 0.5;
            predicted == obs.churned
        })
        .count();
    correct as f64 / observations.len() as f64
}
