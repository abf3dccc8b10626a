//! Service error types with HTTP status code mapping.
//!
//! [`AppError`] is the central error type. Every rejected write, failed
//! lookup and storage failure is one of its variants, and each variant maps
//! to a specific HTTP status code and structured JSON error response.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "validation failed: agenda must not be empty",
///     "details": [{ "field": "agenda", "message": "agenda must not be empty" }]
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`AppError`] for ranges).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Per-field validation failures, when the error has any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// A single rejected field of a candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Record field name as it appears in documents (`title`, `eventId`, ...).
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Standard "must not be empty" error for `field`.
    #[must_use]
    pub fn empty(field: &str) -> Self {
        Self::new(field, format!("{field} must not be empty"))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status                     |
/// |-----------|-----------------------|---------------------------------|
/// | 1000–1999 | Validation            | 400 Bad Request                 |
/// | 2000–2999 | Reference / Not Found | 404 / 409 / 422                 |
/// | 3000–3999 | Server / Database     | 500 / 503                       |
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// One or more record fields failed validation.
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// The event date could not be parsed as a calendar date.
    #[error("invalid date format for event date: {0:?}")]
    InvalidDate(String),

    /// The event time matched neither accepted shape.
    #[error("invalid time format for event time: {0:?}; use HH:MM (24h) or H:MM am/pm")]
    InvalidTime(String),

    /// A 12-hour time carried an hour outside 1–12.
    #[error("invalid hour in event time: {0:?}")]
    InvalidHour(String),

    /// The booking email does not look like `local@domain.tld`.
    #[error("invalid email: {0:?}")]
    InvalidEmail(String),

    /// No event matched the requested slug or id.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// A booking referenced an event that does not exist.
    #[error("cannot create booking: referenced event does not exist: {0}")]
    Reference(String),

    /// Another event already owns the derived slug.
    #[error("an event with slug {0:?} already exists")]
    DuplicateSlug(String),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The database could not be reached or timed out.
    #[error("database unreachable: {0}")]
    Connectivity(String),

    /// Any other storage driver failure.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl AppError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidDate(_) => 1002,
            Self::InvalidTime(_) => 1003,
            Self::InvalidEmail(_) => 1004,
            Self::InvalidHour(_) => 1005,
            Self::EventNotFound(_) => 2001,
            Self::Reference(_) => 2002,
            Self::DuplicateSlug(_) => 2003,
            Self::Configuration(_) => 3001,
            Self::Connectivity(_) => 3002,
            Self::Persistence(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidDate(_)
            | Self::InvalidTime(_)
            | Self::InvalidHour(_)
            | Self::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_) => StatusCode::NOT_FOUND,
            Self::Reference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateSlug(_) => StatusCode::CONFLICT,
            Self::Configuration(_) | Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns `true` for failures worth retrying while connecting.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => Self::Connectivity(err.to_string()),
            ErrorKind::InvalidArgument { .. } => Self::Configuration(err.to_string()),
            _ => Self::Persistence(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();
        let details = match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_field() {
        let err = AppError::Validation(vec![FieldError::empty("title"), FieldError::empty("tags")]);
        assert_eq!(
            err.to_string(),
            "validation failed: title must not be empty; tags must not be empty"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn reference_maps_to_unprocessable() {
        let err = AppError::Reference("65f000000000000000000000".to_string());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), 2002);
        assert!(err.to_string().contains("referenced event does not exist"));
    }

    #[test]
    fn invalid_time_names_accepted_forms() {
        let err = AppError::InvalidTime("noon".to_string());
        let msg = err.to_string();
        assert!(msg.contains("HH:MM (24h)"));
        assert!(msg.contains("H:MM am/pm"));
    }

    #[test]
    fn only_connectivity_is_transient() {
        assert!(AppError::Connectivity("timeout".to_string()).is_transient());
        assert!(!AppError::Configuration("missing".to_string()).is_transient());
        assert!(!AppError::Persistence("boom".to_string()).is_transient());
    }

    #[test]
    fn status_codes_cover_server_errors() {
        assert_eq!(
            AppError::Connectivity(String::new()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::DuplicateSlug("a".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::EventNotFound("a".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
