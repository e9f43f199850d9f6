use crate::models::DbAppointment;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use vetbook_core::models::appointment::Appointment;

/// Outcome of an appointment write that races against the partial unique
/// index on (provider_id, date, start_minutes) over active statuses.
///
/// A constraint hit is an expected "slot already taken" outcome, not a
/// database failure; callers surface it as a booking conflict.
#[derive(Debug)]
pub enum AppointmentWrite {
    Persisted(DbAppointment),
    SlotTaken,
}

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &Appointment,
) -> Result<AppointmentWrite> {
    tracing::debug!(
        "Creating appointment: id={}, provider_id={}, date={}, start={}",
        appointment.id,
        appointment.provider_id,
        appointment.date,
        appointment.start_time
    );

    let result = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (
            id, provider_id, pet_id, date, start_minutes, end_minutes,
            status, reason, check_in_at, check_out_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, provider_id, pet_id, date, start_minutes, end_minutes,
                  status, reason, check_in_at, check_out_at, created_at, updated_at
        "#,
    )
    .bind(appointment.id)
    .bind(appointment.provider_id)
    .bind(appointment.pet_id)
    .bind(appointment.date)
    .bind(appointment.start_time.minutes() as i32)
    .bind(appointment.end_time.minutes() as i32)
    .bind(appointment.status.as_str())
    .bind(&appointment.reason)
    .bind(appointment.check_in_at)
    .bind(appointment.check_out_at)
    .bind(appointment.created_at)
    .bind(appointment.updated_at)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(AppointmentWrite::Persisted(row)),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tracing::debug!(
                "Slot already taken for provider {} on {} at {}",
                appointment.provider_id,
                appointment.date,
                appointment.start_time
            );
            Ok(AppointmentWrite::SlotTaken)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, provider_id, pet_id, date, start_minutes, end_minutes,
               status, reason, check_in_at, check_out_at, created_at, updated_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// The live booking ledger for one provider/date: every appointment whose
/// status still blocks the interval.
pub async fn get_active_appointments(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, provider_id, pet_id, date, start_minutes, end_minutes,
               status, reason, check_in_at, check_out_at, created_at, updated_at
        FROM appointments
        WHERE provider_id = $1
          AND date = $2
          AND status IN ('scheduled', 'confirmed', 'in_progress')
        ORDER BY start_minutes ASC
        "#,
    )
    .bind(provider_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Rewrites an appointment's provider/date/interval (a reschedule). Subject
/// to the same unique index as create.
pub async fn update_appointment(
    pool: &Pool<Postgres>,
    appointment: &Appointment,
) -> Result<AppointmentWrite> {
    let result = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET provider_id = $2, date = $3, start_minutes = $4, end_minutes = $5,
            reason = $6, updated_at = $7
        WHERE id = $1
        RETURNING id, provider_id, pet_id, date, start_minutes, end_minutes,
                  status, reason, check_in_at, check_out_at, created_at, updated_at
        "#,
    )
    .bind(appointment.id)
    .bind(appointment.provider_id)
    .bind(appointment.date)
    .bind(appointment.start_time.minutes() as i32)
    .bind(appointment.end_time.minutes() as i32)
    .bind(&appointment.reason)
    .bind(appointment.updated_at)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(AppointmentWrite::Persisted(row)),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tracing::debug!(
                "Slot already taken for provider {} on {} at {}",
                appointment.provider_id,
                appointment.date,
                appointment.start_time
            );
            Ok(AppointmentWrite::SlotTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// Persists a lifecycle transition: status plus the check-in/check-out
/// stamps the state machine set.
pub async fn update_status(
    pool: &Pool<Postgres>,
    appointment: &Appointment,
) -> Result<DbAppointment> {
    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2, check_in_at = $3, check_out_at = $4, updated_at = $5
        WHERE id = $1
        RETURNING id, provider_id, pet_id, date, start_minutes, end_minutes,
                  status, reason, check_in_at, check_out_at, created_at, updated_at
        "#,
    )
    .bind(appointment.id)
    .bind(appointment.status.as_str())
    .bind(appointment.check_in_at)
    .bind(appointment.check_out_at)
    .bind(appointment.updated_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Removes an appointment row. Returns false when no row matched. The
/// completed-status guard lives with the caller.
pub async fn delete_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
