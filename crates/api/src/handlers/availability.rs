//! # Availability Handlers
//!
//! This module contains handlers for answering "who is available when": the
//! cross-provider availability query, the per-provider day view, and the
//! batch snapshot regeneration call.
//!
//! ## Two sources of truth
//!
//! Availability can be answered from two places that deliberately do not
//! always agree:
//!
//! 1. The **live ledger**: the day's active appointments, read directly.
//!    Every commit decision (and the cross-provider query) uses this path.
//! 2. The **availability snapshot**: a cached, status-annotated slot list
//!    per provider/date, stamped with `generated_at` and the template
//!    version it was built from. Appointment writes leave it stale; it is
//!    rebuilt explicitly via the generate call or lazily on first read.
//!
//! The per-provider day view serves the snapshot (building it when absent);
//! it is an eventually-consistent read optimization, never an authority.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use vetbook_core::{
    booking::find_conflicts,
    errors::BookingError,
    models::availability::{
        AvailabilitySnapshot, AvailableProviderEntry, AvailableProvidersResponse,
        GenerateAvailabilityRequest, GenerateAvailabilityResponse, ProviderAvailabilityResponse,
        Slot, SlotStatus, build_day_slots,
    },
    models::schedule::DayAvailability,
    models::time::{Interval, TimeOfDay},
    slots::candidate_slots,
};

use crate::{
    ApiState,
    handlers::{active_intervals, resolve_provider_day},
    middleware::error_handling::AppError,
};

/// Query parameters for the cross-provider availability endpoint
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// The date to check, `YYYY-MM-DD`
    pub date: chrono::NaiveDate,

    /// Optional exact start time; when given, a provider only counts as
    /// available if a slot-sized interval at this time is free
    pub time: Option<TimeOfDay>,
}

/// Query parameters for the per-provider day view
#[derive(Debug, Deserialize)]
pub struct ProviderAvailabilityQuery {
    pub date: chrono::NaiveDate,
}

/// Lists every active provider with their open slots for a date
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?date=2025-06-02&time=09:30
/// ```
///
/// For each active provider the handler resolves the working day (template
/// or injected default, plus any exception), generates candidate slots, and
/// marks them against the **live** ledger, never the snapshot. A provider is
/// `available` when at least one open slot remains; with `time` given, the
/// requested slot-sized interval must additionally fall inside the working
/// window and conflict with nothing.
#[axum::debug_handler]
pub async fn query_available_providers(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableProvidersResponse>, AppError> {
    let providers = vetbook_db::repositories::provider::list_active_providers(&state.db_pool)
        .await
        .map_err(BookingError::Database)?;

    let mut entries = Vec::with_capacity(providers.len());
    for provider in providers {
        let (day, _) = resolve_provider_day(&state, provider.id, query.date).await?;
        let booked = active_intervals(&state.db_pool, provider.id, query.date, None).await?;

        let open_slots: Vec<Slot> = candidate_slots(&day)
            .into_iter()
            .filter(|slot| find_conflicts(*slot, &booked).is_empty())
            .map(|interval| Slot {
                start: interval.start,
                end: interval.end,
                status: SlotStatus::Available,
            })
            .collect();

        let mut available = !open_slots.is_empty();
        if available {
            if let Some(time) = query.time {
                available = requested_interval_is_free(&day, time, &booked)?;
            }
        }

        entries.push(AvailableProviderEntry {
            provider_id: provider.id,
            name: provider.name,
            available,
            slots: open_slots,
        });
    }

    Ok(Json(AvailableProvidersResponse {
        date: query.date,
        providers: entries,
    }))
}

/// Whether a slot-sized interval starting at `time` is inside the working
/// window and free of conflicts.
fn requested_interval_is_free(
    day: &DayAvailability,
    time: TimeOfDay,
    booked: &[Interval],
) -> Result<bool, AppError> {
    let resolved = match day {
        DayAvailability::Closed { .. } => return Ok(false),
        DayAvailability::Open(resolved) => resolved,
    };

    let end = time.minutes().saturating_add(resolved.slot_minutes);
    let Ok(end) = TimeOfDay::from_minutes(end) else {
        return Ok(false);
    };
    let requested = Interval::new(time, end).map_err(AppError::from)?;

    Ok(resolved.window.contains(&requested) && find_conflicts(requested, booked).is_empty())
}

/// Serves the cached day view for one provider
///
/// # Endpoint
///
/// ```text
/// GET /api/providers/:id/availability?date=2025-06-02
/// ```
///
/// Reads the availability snapshot for the provider/date, lazily building
/// and persisting it when absent. The snapshot is not refreshed when it is
/// merely stale; callers that need commit-grade accuracy go through the
/// booking path, which always re-validates against the live ledger.
#[axum::debug_handler]
pub async fn query_provider_availability(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<ProviderAvailabilityQuery>,
) -> Result<Json<ProviderAvailabilityResponse>, AppError> {
    let provider = vetbook_db::repositories::provider::get_provider_by_id(&state.db_pool, provider_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Provider with ID {} not found", provider_id)))?;

    let (day, template_version) = resolve_provider_day(&state, provider.id, query.date).await?;

    let snapshot = vetbook_db::repositories::snapshot::get_snapshot(&state.db_pool, provider.id, query.date)
        .await
        .map_err(BookingError::Database)?;

    let snapshot = match snapshot {
        Some(row) => AvailabilitySnapshot::try_from(row).map_err(BookingError::Database)?,
        None => build_and_store_snapshot(&state, provider.id, query.date, &day, template_version).await?,
    };

    let available = snapshot
        .slots
        .iter()
        .any(|slot| slot.status == SlotStatus::Available);

    Ok(Json(ProviderAvailabilityResponse {
        provider_id: provider.id,
        date: query.date,
        available,
        working_window: day.working_window(),
        slots: snapshot.slots,
        generated_at: snapshot.generated_at,
        template_version: snapshot.template_version,
    }))
}

/// Rebuilds availability snapshots for a provider over a date range
///
/// # Endpoint
///
/// ```text
/// POST /api/providers/:id/availability/generate
/// { "from": "2025-06-02", "to": "2025-06-08" }
/// ```
///
/// Each date is rebuilt independently from the live ledger and upserted on
/// its own; there is no lock across the range, re-running is idempotent, and
/// stopping early leaves the already-written snapshots valid.
#[axum::debug_handler]
pub async fn generate_availability(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
    Json(payload): Json<GenerateAvailabilityRequest>,
) -> Result<Json<GenerateAvailabilityResponse>, AppError> {
    if payload.to < payload.from {
        return Err(AppError(BookingError::Validation(format!(
            "Invalid date range: {} is before {}",
            payload.to, payload.from
        ))));
    }

    let provider = vetbook_db::repositories::provider::get_provider_by_id(&state.db_pool, provider_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Provider with ID {} not found", provider_id)))?;

    let mut dates_processed = Vec::new();
    let mut date = payload.from;
    while date <= payload.to {
        let (day, template_version) = resolve_provider_day(&state, provider.id, date).await?;
        build_and_store_snapshot(&state, provider.id, date, &day, template_version).await?;
        dates_processed.push(date);

        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    tracing::info!(
        "Regenerated availability for provider {} over {} dates",
        provider.id,
        dates_processed.len()
    );

    Ok(Json(GenerateAvailabilityResponse {
        provider_id: provider.id,
        dates_processed,
    }))
}

/// Builds one provider/date snapshot from the live ledger and persists it.
pub(crate) async fn build_and_store_snapshot(
    state: &ApiState,
    provider_id: Uuid,
    date: chrono::NaiveDate,
    day: &DayAvailability,
    template_version: i32,
) -> Result<AvailabilitySnapshot, AppError> {
    let booked = active_intervals(&state.db_pool, provider_id, date, None).await?;

    let snapshot = AvailabilitySnapshot {
        provider_id,
        date,
        slots: build_day_slots(day, &booked),
        generated_at: Utc::now(),
        template_version,
    };

    vetbook_db::repositories::snapshot::upsert_snapshot(&state.db_pool, &snapshot)
        .await
        .map_err(BookingError::Database)?;

    Ok(snapshot)
}
