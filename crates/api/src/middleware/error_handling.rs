//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Vetbook
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! All rejected bookings carry enough detail for a caller to propose an
//! alternative without a second round trip: a conflict response embeds the
//! clashing interval, a schedule violation names the valid window in its
//! message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use vetbook_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific [`BookingError`] instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BookingError);

/// Converts application errors to HTTP responses
///
/// Expected, recoverable outcomes (everything except `Database`) are returned
/// without noise; genuine storage failures are logged at error level before
/// the opaque 500 goes out.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict { .. } => StatusCode::CONFLICT,
            BookingError::Schedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::State(_) => StatusCode::CONFLICT,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let BookingError::Database(report) = &self.0 {
            tracing::error!("Request failed with database error: {:?}", report);
        }

        // Conflicts carry the clashing interval for client display
        let body = match &self.0 {
            BookingError::Conflict { interval } => Json(json!({
                "error": self.0.to_string(),
                "conflict": { "start": interval.start, "end": interval.end },
            })),
            _ => Json(json!({ "error": self.0.to_string() })),
        };

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, BookingError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Repository functions return `eyre::Result`; an error reaching a handler
/// this way is a genuine storage failure and maps to the fatal variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}
