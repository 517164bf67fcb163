//! Error types for custdash-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use custdash_core::{CoreError, ErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Chart rendering failed: {message}")]
    Chart { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Chart { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Core(e) => match e.code() {
                ErrorCode::CustomerNotFound => StatusCode::NOT_FOUND,
                ErrorCode::FetchFailed | ErrorCode::BadStatus | ErrorCode::DecodeError => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        let body = match &self {
            ApiError::Core(e) => serde_json::to_value(e.to_details()).unwrap_or_default(),
            other => serde_json::json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found: ApiError = CoreError::CustomerNotFound { id: "7".to_string() }.into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let upstream: ApiError = CoreError::BadStatus { resource: "customers".to_string(), status: 500 }.into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let chart = ApiError::Chart { message: "io".to_string() };
        assert_eq!(chart.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
