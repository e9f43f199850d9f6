use axum::http::StatusCode;
use axum::response::IntoResponse;
use pretty_assertions::assert_eq;
use vetbook_api::middleware::error_handling::AppError;
use vetbook_core::errors::BookingError;
use vetbook_core::models::time::{Interval, TimeOfDay};

fn t(s: &str) -> TimeOfDay {
    s.parse().expect("valid time of day")
}

fn status_for(error: BookingError) -> StatusCode {
    AppError(error).into_response().status()
}

#[test]
fn test_error_status_mapping() {
    assert_eq!(
        status_for(BookingError::NotFound("missing".into())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_for(BookingError::Validation("bad time".into())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(BookingError::Conflict {
            interval: Interval::new(t("09:00"), t("09:30")).expect("valid interval"),
        }),
        StatusCode::CONFLICT
    );
    assert_eq!(
        status_for(BookingError::Schedule("outside hours".into())),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        status_for(BookingError::State("bad transition".into())),
        StatusCode::CONFLICT
    );
    assert_eq!(
        status_for(BookingError::Database(eyre::eyre!("pool gone"))),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_conflict_response_names_the_clashing_interval() {
    let error = AppError(BookingError::Conflict {
        interval: Interval::new(t("09:00"), t("09:30")).expect("valid interval"),
    });

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");

    assert_eq!(body["conflict"]["start"], "09:00");
    assert_eq!(body["conflict"]["end"], "09:30");
    assert_eq!(body["error"], "Conflicting appointment at 09:00-09:30");
}

#[tokio::test]
async fn test_plain_error_body_carries_the_message() {
    let response = AppError(BookingError::Schedule(
        "Requested time 18:00-18:30 is outside working hours 08:00-17:00".to_string(),
    ))
    .into_response();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");

    assert_eq!(
        body["error"],
        "Schedule violation: Requested time 18:00-18:30 is outside working hours 08:00-17:00"
    );
    assert!(body.get("conflict").is_none());
}

#[test]
fn test_eyre_reports_map_to_database_errors() {
    let error: AppError = eyre::eyre!("connection reset").into();
    assert!(matches!(error.0, BookingError::Database(_)));
}
