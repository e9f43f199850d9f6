use std::error::Error;
use vetbook_core::errors::{BookingError, BookingResult};
use vetbook_core::models::time::{Interval, TimeOfDay};

fn t(s: &str) -> TimeOfDay {
    s.parse().expect("valid time of day")
}

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Provider not found".to_string());
    let validation = BookingError::Validation("Invalid input".to_string());
    let conflict = BookingError::Conflict {
        interval: Interval::new(t("09:00"), t("09:30")).expect("valid interval"),
    };
    let schedule = BookingError::Schedule("Outside working hours".to_string());
    let state = BookingError::State("completed to scheduled".to_string());
    let database = BookingError::Database(eyre::eyre!("Database connection failed"));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Provider not found"
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        conflict.to_string(),
        "Conflicting appointment at 09:00-09:30"
    );
    assert_eq!(
        schedule.to_string(),
        "Schedule violation: Outside working hours"
    );
    assert_eq!(
        state.to_string(),
        "Invalid status transition: completed to scheduled"
    );
    assert!(database.to_string().contains("Database error:"));
}

#[test]
fn test_error_source_chain() {
    let report = eyre::eyre!("Connection refused");
    let error = BookingError::Database(report);

    assert!(error.source().is_some());
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_eyre_report_conversion() {
    fn fails() -> BookingResult<()> {
        Err(eyre::eyre!("Pool exhausted"))?
    }

    let error = fails().unwrap_err();
    assert!(matches!(error, BookingError::Database(_)));
    assert!(error.to_string().contains("Pool exhausted"));
}
