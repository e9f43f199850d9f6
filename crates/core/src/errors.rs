use thiserror::Error;

use crate::models::time::Interval;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflicting appointment at {interval}")]
    Conflict { interval: Interval },

    #[error("Schedule violation: {0}")]
    Schedule(String),

    #[error("Invalid status transition: {0}")]
    State(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

pub type BookingResult<T> = Result<T, BookingError>;
