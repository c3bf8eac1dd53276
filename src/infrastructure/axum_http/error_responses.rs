use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::usecases::{posts::PostError, subscriptions::SubscriptionError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Renders `{code, message}`. Server-side failures never expose their detail.
pub fn error_response(status: StatusCode, message: String) -> Response {
    let message = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
        "Internal server error".to_string()
    } else {
        message
    };

    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message,
    });

    (status, body).into_response()
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

impl From<anyhow::Error> for ErrorResponse {
    fn from(_: anyhow::Error) -> Self {
        ErrorResponse {
            code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
