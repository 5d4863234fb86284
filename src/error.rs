//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::models::FormError;
use crate::pipeline::PredictError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Model errors
    ModelUnavailable(String),
    PredictionFailed(String),

    // Validation errors
    ValidationError(Vec<String>),

    // Generic errors
    RenderError(String),
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::ModelUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone(), None),
            AppError::PredictionFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred during prediction: {}", msg),
                None,
            ),
            AppError::ValidationError(messages) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid customer record".to_string(),
                Some(messages.clone()),
            ),
            AppError::RenderError(msg) => {
                tracing::error!("Template error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page".to_string(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), None)
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::PredictionFailed(err.to_string())
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::ValidationError(err.messages())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        FormError::from(err).into()
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::RenderError(err.to_string())
    }
}
