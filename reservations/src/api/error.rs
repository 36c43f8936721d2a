//! Error types for HTTP handlers.
//!
//! [`AppError`] bridges domain and runtime errors to HTTP responses with a
//! `{ "code", "message" }` JSON body.

use crate::error::ReservationError;
use alrock_runtime::StoreError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Table>, AppError> {
///     let table = registry.find(&id)?.clone();
///     Ok(Json(table))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    code: String,
    /// Internal error, logged but never sent to the client
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
            source: None,
        }
    }

    /// Attach the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code of the response
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND",
        )
    }

    /// Create a 408 Request Timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, message, "TIMEOUT")
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message, "SERVICE_UNAVAILABLE")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        let status = match err {
            ReservationError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ReservationError::NotFound { .. } => StatusCode::NOT_FOUND,
            ReservationError::InvalidState(_) | ReservationError::Ambiguous { .. } => {
                StatusCode::CONFLICT
            },
            ReservationError::Unauthorized => StatusCode::UNAUTHORIZED,
        };
        Self::new(status, err.to_string(), err.code())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout => Self::timeout(
                "the restaurant did not confirm in time; the request may still have been applied",
            ),
            other => Self::unavailable("the reservation service is not accepting requests")
                .with_source(anyhow::Error::new(other)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::internal("Unexpected action received");
        assert_eq!(err.to_string(), "[INTERNAL_SERVER_ERROR] Unexpected action received");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Booking", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] Booking with id 123 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (ReservationError::validation("email", "email is required"), StatusCode::UNPROCESSABLE_ENTITY),
            (ReservationError::not_found("Reservation", "9"), StatusCode::NOT_FOUND),
            (ReservationError::InvalidState("already cancelled".to_string()), StatusCode::CONFLICT),
            (
                ReservationError::Ambiguous {
                    term: "+34".to_string(),
                    matches: 2,
                },
                StatusCode::CONFLICT,
            ),
            (ReservationError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (domain, status) in cases {
            let code = domain.code();
            let err = AppError::from(domain);
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_store_errors() {
        let err = AppError::from(StoreError::Timeout);
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(err.to_string().contains("may still have been applied"));

        let err = AppError::from(StoreError::ShutdownInProgress);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(std::error::Error::source(&err).is_some());
    }
}
