use axum::http::{ Method, StatusCode };
use axum::response::{ IntoResponse, Response };
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::error::{ ConfigurationError, ValidationError };

/// Every way a routed call can fail before the pipeline answers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unknown request for {0}")]
    UnknownRoute(String),
    #[error("Method {method} is not supported for {endpoint}")]
    MethodNotAllowed {
        method: Method,
        endpoint: String,
    },
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Configuration(_) | ApiError::UnknownRoute(_) =>
                StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
