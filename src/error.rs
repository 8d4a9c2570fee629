use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::services::parser::ParseError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(#[from] ParseError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Network-level failures that may succeed when the same call is repeated.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Reqwest(_) | Error::Upstream(_) | Error::Io(_))
    }

    /// Failures worth another generation attempt: transient ones plus model
    /// output that failed its shape check or produced an undecodable image.
    pub fn is_retryable(&self) -> bool {
        self.is_transient() || matches!(self, Error::MalformedOutput(_) | Error::Image(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Upstream(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", msg),
            ),
            Error::MalformedOutput(err) => (
                StatusCode::BAD_GATEWAY,
                format!("Generation failed: {}", err),
            ),
            Error::Image(err) => (
                StatusCode::BAD_GATEWAY,
                format!("Generated image could not be processed: {}", err),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_failures_are_retryable_but_not_transient() {
        let err = Error::MalformedOutput(ParseError::MissingField("options"));
        assert!(err.is_retryable());
        assert!(!err.is_transient());

        let err = Error::Upstream("503 Service Unavailable".into());
        assert!(err.is_retryable());
        assert!(err.is_transient());

        assert!(!Error::BadRequest("nope".into()).is_retryable());
    }

    #[test]
    fn malformed_output_maps_to_bad_gateway() {
        let resp = Error::MalformedOutput(ParseError::Empty).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let resp = Error::NotFound("image_9.png".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
