//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::ScannerError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    raw_response: Option<String>,
    exception: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            raw_response: None,
            exception: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ScannerError> for ApiError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::InvalidInput(message) => ApiError::bad_request(message),
            ScannerError::InvalidModelOutput { message, raw } => ApiError {
                status: StatusCode::BAD_GATEWAY,
                message: "Model returned invalid JSON".to_string(),
                raw_response: Some(raw),
                exception: Some(message),
            },
            err if err.is_upstream() => ApiError::new(StatusCode::BAD_GATEWAY, err.to_string()),
            err => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(status = %self.status, message = %self.message, "api error");
        let body = Json(ErrorBody {
            error: self.message,
            raw_response: self.raw_response,
            exception: self.exception,
        });
        (self.status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<String>,
}
