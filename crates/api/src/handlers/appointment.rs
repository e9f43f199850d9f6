use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use vetbook_core::{
    booking::{find_conflicts, validate_booking},
    errors::BookingError,
    models::appointment::{
        Appointment, AppointmentResponse, AppointmentStatus, CreateAppointmentRequest,
        TransitionStatusRequest, UpdateAppointmentRequest,
    },
    models::time::Interval,
};
use vetbook_db::repositories::appointment::AppointmentWrite;

use crate::{
    ApiState,
    handlers::{active_intervals, resolve_provider_day},
    middleware::error_handling::AppError,
};

/// Books an appointment.
///
/// The flow is check-then-act: provider and pet existence are collaborator
/// reads that may go stale, the working-window and overlap checks run
/// against the live ledger, and the insert finally races the partial unique
/// index on (provider, date, start) over active statuses. Losing that race
/// is reported as the same conflict a check-time overlap produces.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let candidate = Interval::new(payload.start_time, payload.end_time)?;

    let provider = vetbook_db::repositories::provider::get_provider_by_id(
        &state.db_pool,
        payload.provider_id,
    )
    .await
    .map_err(BookingError::Database)?
    .ok_or_else(|| {
        BookingError::NotFound(format!("Provider with ID {} not found", payload.provider_id))
    })?;

    if !provider.active {
        return Err(AppError(BookingError::Schedule(format!(
            "Provider {} is not accepting appointments",
            provider.id
        ))));
    }

    vetbook_db::repositories::provider::get_pet_by_id(&state.db_pool, payload.pet_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Pet with ID {} not found", payload.pet_id)))?;

    let (day, _) = resolve_provider_day(&state, provider.id, payload.date).await?;
    let booked = active_intervals(&state.db_pool, provider.id, payload.date, None).await?;
    validate_booking(&day, candidate, &booked)?;

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        provider_id: provider.id,
        pet_id: payload.pet_id,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        status: AppointmentStatus::Scheduled,
        reason: payload.reason,
        check_in_at: None,
        check_out_at: None,
        created_at: now,
        updated_at: now,
    };

    let written = vetbook_db::repositories::appointment::create_appointment(&state.db_pool, &appointment)
        .await
        .map_err(BookingError::Database)?;

    match written {
        AppointmentWrite::Persisted(row) => {
            tracing::info!(
                "Booked appointment {} for provider {} on {} at {}",
                appointment.id,
                provider.id,
                appointment.date,
                appointment.start_time
            );
            let appointment = Appointment::try_from(row).map_err(BookingError::Database)?;
            Ok(Json(appointment.into()))
        }
        AppointmentWrite::SlotTaken => {
            Err(slot_taken_conflict(&state, provider.id, payload.date, candidate).await)
        }
    }
}

/// Names the interval that won a lost insert race. The racing row may not be
/// visible yet; the requested interval stands in when it is not.
async fn slot_taken_conflict(
    state: &ApiState,
    provider_id: Uuid,
    date: chrono::NaiveDate,
    candidate: Interval,
) -> AppError {
    let interval = match active_intervals(&state.db_pool, provider_id, date, None).await {
        Ok(booked) => find_conflicts(candidate, &booked)
            .into_iter()
            .next()
            .unwrap_or(candidate),
        Err(_) => candidate,
    };
    AppError(BookingError::Conflict { interval })
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = load_appointment(&state, id).await?;
    Ok(Json(appointment.into()))
}

/// Reschedules or edits an appointment.
///
/// Time, date and provider changes re-run the exact validation used at
/// create, with the appointment's own prior interval excluded from the
/// conflict set so a no-op reschedule always succeeds.
#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let mut appointment = load_appointment(&state, id).await?;

    if !appointment.status.is_active() {
        return Err(AppError(BookingError::State(format!(
            "Cannot modify appointment {} in {} status",
            id, appointment.status
        ))));
    }

    let provider_id = payload.provider_id.unwrap_or(appointment.provider_id);
    let date = payload.date.unwrap_or(appointment.date);
    let start_time = payload.start_time.unwrap_or(appointment.start_time);
    let end_time = payload.end_time.unwrap_or(appointment.end_time);
    let candidate = Interval::new(start_time, end_time)?;

    if provider_id != appointment.provider_id {
        let provider =
            vetbook_db::repositories::provider::get_provider_by_id(&state.db_pool, provider_id)
                .await
                .map_err(BookingError::Database)?
                .ok_or_else(|| {
                    BookingError::NotFound(format!("Provider with ID {} not found", provider_id))
                })?;
        if !provider.active {
            return Err(AppError(BookingError::Schedule(format!(
                "Provider {} is not accepting appointments",
                provider.id
            ))));
        }
    }

    let (day, _) = resolve_provider_day(&state, provider_id, date).await?;
    let booked = active_intervals(&state.db_pool, provider_id, date, Some(id)).await?;
    validate_booking(&day, candidate, &booked)?;

    appointment.provider_id = provider_id;
    appointment.date = date;
    appointment.start_time = start_time;
    appointment.end_time = end_time;
    if let Some(reason) = payload.reason {
        appointment.reason = Some(reason);
    }
    appointment.updated_at = Utc::now();

    let written = vetbook_db::repositories::appointment::update_appointment(&state.db_pool, &appointment)
        .await
        .map_err(BookingError::Database)?;

    match written {
        AppointmentWrite::Persisted(row) => {
            let appointment = Appointment::try_from(row).map_err(BookingError::Database)?;
            Ok(Json(appointment.into()))
        }
        AppointmentWrite::SlotTaken => {
            Err(slot_taken_conflict(&state, provider_id, date, candidate).await)
        }
    }
}

/// Applies a lifecycle transition.
///
/// The state machine lives on the domain model; this handler only loads,
/// applies and persists. Disallowed transitions come back as state errors,
/// and check-in/check-out stamps are written exactly once.
#[axum::debug_handler]
pub async fn transition_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionStatusRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let mut appointment = load_appointment(&state, id).await?;

    appointment.transition(payload.status, Utc::now())?;

    let row = vetbook_db::repositories::appointment::update_status(&state.db_pool, &appointment)
        .await
        .map_err(BookingError::Database)?;

    tracing::info!("Appointment {} transitioned to {}", id, payload.status);

    let appointment = Appointment::try_from(row).map_err(BookingError::Database)?;
    Ok(Json(appointment.into()))
}

/// Deletes an appointment record. Completed visits are immutable history and
/// cannot be removed.
#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let appointment = load_appointment(&state, id).await?;

    if appointment.status == AppointmentStatus::Completed {
        return Err(AppError(BookingError::State(format!(
            "Cannot delete completed appointment {}",
            id
        ))));
    }

    vetbook_db::repositories::appointment::delete_appointment(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn load_appointment(state: &ApiState, id: Uuid) -> Result<Appointment, AppError> {
    let row = vetbook_db::repositories::appointment::get_appointment_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;

    Appointment::try_from(row)
        .map_err(BookingError::Database)
        .map_err(AppError::from)
}
