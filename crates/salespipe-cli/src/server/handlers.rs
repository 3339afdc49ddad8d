//! Prediction endpoint handlers.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use salespipe::ContractTerm;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;

/// Request body for `POST /predict`. Field names follow the feature
/// table's column names.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub tenure: i64,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
    #[serde(rename = "Contract")]
    pub contract: String,
}

/// Response body for `POST /predict`.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub churn_prediction: String,
    /// Rounded to 2 decimal places.
    pub churn_probability: f64,
}

/// Score one customer.
///
/// An unrecognized contract term is a client error; it is never silently
/// encoded as month-to-month.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let contract = request
        .contract
        .parse::<ContractTerm>()
        .map_err(ApiError::BadRequest)?;

    let features = [
        request.tenure as f64,
        request.monthly_charges,
        request.total_charges,
        contract.code(),
    ];
    let prediction = state.model.predict(&features);

    Ok(Json(PredictResponse {
        churn_prediction: if prediction.churned { "Yes" } else { "No" }.to_string(),
        churn_probability: prediction.probability,
    }))
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_path: String,
    pub trained_at: DateTime<Utc>,
    pub holdout_accuracy: f64,
    pub features: Vec<String>,
}

/// Service and model metadata.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_path: state.model_path.display().to_string(),
        trained_at: state.model.trained_at,
        holdout_accuracy: state.model.holdout_accuracy,
        features: state.model.feature_names.clone(),
    })
}
