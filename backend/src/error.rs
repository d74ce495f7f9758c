use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("access to {0} is forbidden")]
    Forbidden(String),
    #[error("request body of {0} bytes exceeds the limit")]
    PayloadTooLarge(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::NotFound(_) => StatusCode::NOT_FOUND,
            ServeError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServeError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let message = match &self {
            ServeError::NotFound(_) => "Page not found",
            ServeError::Forbidden(_) => "Access to this file is forbidden",
            ServeError::PayloadTooLarge(_) => "Request entity too large",
            ServeError::Io(_) => "Internal server error",
        };
        (self.status(), message).into_response()
    }
}
