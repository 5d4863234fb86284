//! JSON prediction API

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::{AppState, AppError, AppResult};
use crate::models::{CustomerRecord, PredictionOutcome};
use crate::pipeline::Label;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: Label,
    pub churn: bool,
    pub verdict: &'static str,
    /// Affirmative-class probability in [0, 1]
    pub probability: Option<f64>,
}

/// Predict churn for one JSON-encoded customer record
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<CustomerRecord>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let model = state
        .model
        .ready()
        .map_err(|why| AppError::ModelUnavailable(why.user_message()))?;

    let Json(record) = payload.map_err(|rejection| {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        AppError::ValidationError(vec![rejection.body_text()])
    })?;

    record.validate()?;

    let outcome = PredictionOutcome::compute(&**model, &record).map_err(|e| {
        tracing::warn!("Prediction failed: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(PredictResponse {
        churn: outcome.verdict.churns(),
        verdict: outcome.verdict.headline(),
        probability: outcome.churn_probability,
        label: outcome.label,
    }))
}
