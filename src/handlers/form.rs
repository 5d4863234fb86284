//! Prediction form handlers
//!
//! `GET /` renders the form, `POST /predict` validates the submission, runs
//! the model once and re-renders the form with the result underneath. A failed
//! prediction is shown inline; the form stays usable.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};

use crate::{AppState, AppResult};
use crate::models::{CustomerForm, PredictionOutcome};
use crate::pipeline::loader::Unavailable;
use crate::views::{FormPage, ResultView};

/// Blocking page served while no model is loaded
fn unavailable(state: &AppState, why: &Unavailable) -> AppResult<Response> {
    let html = state.views.unavailable(&why.user_message())?;
    Ok((StatusCode::SERVICE_UNAVAILABLE, Html(html)).into_response())
}

/// Render the empty form with default values
pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let model = match state.model.ready() {
        Ok(model) => model,
        Err(why) => return unavailable(&state, why),
    };

    let html = state.views.form(model.name(), FormPage::default())?;
    Ok(Html(html).into_response())
}

/// Handle a form submission
pub async fn predict(
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> AppResult<Response> {
    let model = match state.model.ready() {
        Ok(model) => model,
        Err(why) => return unavailable(&state, why),
    };

    let mut page = FormPage {
        values: Some(&form),
        ..Default::default()
    };

    let record = match form.parse() {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!("Rejected submission: {}", e);
            page.field_errors = e.messages();
            let html = state.views.form(model.name(), page)?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    };

    match PredictionOutcome::compute(&**model, &record) {
        Ok(outcome) => {
            tracing::info!(
                "Prediction: label={} verdict={} probability={:?}",
                outcome.label,
                outcome.verdict.headline(),
                outcome.churn_probability
            );
            page.result = Some(ResultView::from(&outcome));
        }
        Err(e) => {
            tracing::warn!("Prediction failed: {}", e);
            page.prediction_error = Some(e.to_string());
        }
    }

    let html = state.views.form(model.name(), page)?;
    Ok(Html(html).into_response())
}
