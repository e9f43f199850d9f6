pub mod appointment;
pub mod availability;
pub mod provider;

use chrono::{Datelike, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;
use vetbook_core::errors::BookingError;
use vetbook_core::models::appointment::Appointment;
use vetbook_core::models::schedule::{DayAvailability, ScheduleException, resolve_day};
use vetbook_core::models::time::Interval;

use crate::{ApiState, middleware::error_handling::AppError};

/// Template version recorded on snapshots built from the configured default
/// schedule (providers that never set a weekly template).
pub const DEFAULT_TEMPLATE_VERSION: i32 = 0;

/// Resolves one provider day: latest template version (or the injected
/// default schedule), merged with any exception for the date. Returns the
/// availability together with the template version it came from.
pub(crate) async fn resolve_provider_day(
    state: &ApiState,
    provider_id: Uuid,
    date: NaiveDate,
) -> Result<(DayAvailability, i32), AppError> {
    let template =
        vetbook_db::repositories::template::get_latest_template(&state.db_pool, provider_id)
            .await
            .map_err(BookingError::Database)?;

    let (day_config, template_version) = match template {
        Some(template) => {
            let day = template.day_for(date).clone();
            (day, template.version)
        }
        None => {
            let weekday = date.weekday().num_days_from_monday() as usize;
            (
                state.default_template[weekday].clone(),
                DEFAULT_TEMPLATE_VERSION,
            )
        }
    };

    let exception =
        vetbook_db::repositories::exception::get_exception_for_date(&state.db_pool, provider_id, date)
            .await
            .map_err(BookingError::Database)?
            .map(ScheduleException::try_from)
            .transpose()
            .map_err(BookingError::Database)?;

    let day = resolve_day(&day_config, exception.as_ref())?;
    Ok((day, template_version))
}

/// Loads the live booking ledger for one provider/date as intervals,
/// optionally excluding one appointment (its own prior interval must not
/// count against a reschedule).
pub(crate) async fn active_intervals(
    pool: &PgPool,
    provider_id: Uuid,
    date: NaiveDate,
    exclude: Option<Uuid>,
) -> Result<Vec<Interval>, AppError> {
    let rows =
        vetbook_db::repositories::appointment::get_active_appointments(pool, provider_id, date)
            .await
            .map_err(BookingError::Database)?;

    let mut intervals = Vec::with_capacity(rows.len());
    for row in rows {
        if exclude == Some(row.id) {
            continue;
        }
        let appointment = Appointment::try_from(row).map_err(BookingError::Database)?;
        intervals.push(appointment.interval());
    }
    Ok(intervals)
}
