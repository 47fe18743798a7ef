use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::sources::SourceError;

pub mod movies;

/// Result alias for JSON payloads that map API errors automatically.
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Flat error envelope returned to HTTP clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Canonical API error that converts into the shared JSON envelope.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    #[source]
    source: Option<anyhow::Error>,
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            source: None,
            status,
            message: message.into(),
        }
    }

    fn with_source(
        status: StatusCode,
        message: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self {
            source: Some(source),
            status,
            message: message.into(),
        }
    }

    /// Build a resource-not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Build a method-not-allowed error (HTTP 405).
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    /// Build an internal server error that logs the provided source.
    pub fn internal_with_source(err: impl Into<anyhow::Error>) -> Self {
        Self::with_source(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error",
            err.into(),
        )
    }

    /// Expose the HTTP status code for logging/tests.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Every upstream failure is reported to the caller as one gateway error;
/// the source's message is the client-visible text.
impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        let message = err.to_string();
        Self::with_source(StatusCode::BAD_GATEWAY, message, err.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal_with_source(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError {
            source,
            status,
            message,
        } = self;

        if status.is_server_error() {
            match &source {
                Some(err) => tracing::error!(
                    error = ?err,
                    status = %status,
                    message = message.as_str(),
                    "api error"
                ),
                None => tracing::error!(
                    status = %status,
                    message = message.as_str(),
                    "api error"
                ),
            }
        } else {
            tracing::warn!(
                status = %status,
                message = message.as_str(),
                "api error"
            );
        }

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();
        response
            .extensions_mut()
            .insert(ErrorEnvelopeApplied::default());
        response
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ErrorEnvelopeApplied;

/// Middleware that rewrites Axum default errors into the shared envelope.
pub async fn ensure_error_envelope(req: Request<Body>, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();

    if (status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_FOUND)
        && response
            .extensions()
            .get::<ErrorEnvelopeApplied>()
            .is_none()
    {
        return match status {
            StatusCode::METHOD_NOT_ALLOWED => {
                ApiError::method_not_allowed("method not allowed").into_response()
            }
            StatusCode::NOT_FOUND => ApiError::not_found("route not found").into_response(),
            _ => unreachable!(),
        };
    }

    response
}

/// Fallback handler ensuring unknown routes return the API envelope.
pub async fn fallback_handler() -> ApiError {
    ApiError::not_found("route not found")
}
