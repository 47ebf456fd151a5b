use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Workbook error: {0}")]
    Workbook(#[from] workbook::WorkbookError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
    #[error("Invalid input: {0}")]
    Input(#[from] core_types::CoreError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Workbook(err) if err.is_validation() => {
                tracing::warn!(error = %err, "Workbook validation failed.");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Workbook(err) => {
                tracing::error!(error = ?err, "Workbook load error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to load data: {}", err),
                )
            }
            AppError::Analytics(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Input(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
