use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use vetbook_core::{
    errors::BookingError,
    models::provider::{CreatePetRequest, CreateProviderRequest, Pet, Provider},
    models::schedule::{
        CreateExceptionRequest, ExceptionResponse, ScheduleException, SetTemplateRequest,
        TemplateResponse,
    },
};

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_provider(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateProviderRequest>,
) -> Result<Json<Provider>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Provider name must not be empty".to_string(),
        )));
    }

    let provider = vetbook_db::repositories::provider::create_provider(&state.db_pool, &payload.name)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(provider.into()))
}

#[axum::debug_handler]
pub async fn get_provider(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Provider>, AppError> {
    let provider = vetbook_db::repositories::provider::get_provider_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Provider with ID {} not found", id)))?;

    Ok(Json(provider.into()))
}

#[axum::debug_handler]
pub async fn create_pet(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreatePetRequest>,
) -> Result<Json<Pet>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Pet name must not be empty".to_string(),
        )));
    }

    let pet = vetbook_db::repositories::provider::create_pet(
        &state.db_pool,
        payload.owner_id,
        &payload.name,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(pet.into()))
}

/// Replaces a provider's weekly template.
///
/// Edits insert a new version rather than rewriting the old one, so
/// snapshots built from earlier versions stay attributable.
#[axum::debug_handler]
pub async fn set_template(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
    Json(payload): Json<SetTemplateRequest>,
) -> Result<Json<TemplateResponse>, AppError> {
    ensure_provider_exists(&state, provider_id).await?;

    if payload.days.len() != 7 {
        return Err(AppError(BookingError::Validation(format!(
            "Weekly template must have 7 day configs, got {}",
            payload.days.len()
        ))));
    }
    for day in &payload.days {
        day.validate()?;
    }

    let template =
        vetbook_db::repositories::template::set_template(&state.db_pool, provider_id, &payload.days)
            .await
            .map_err(BookingError::Database)?;

    tracing::info!(
        "Provider {} now on template version {}",
        provider_id,
        template.version
    );

    Ok(Json(template.into()))
}

#[axum::debug_handler]
pub async fn get_template(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<TemplateResponse>, AppError> {
    ensure_provider_exists(&state, provider_id).await?;

    let template =
        vetbook_db::repositories::template::get_latest_template(&state.db_pool, provider_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "Provider {} has no weekly template configured",
                    provider_id
                ))
            })?;

    Ok(Json(template.into()))
}

#[axum::debug_handler]
pub async fn create_exception(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
    Json(payload): Json<CreateExceptionRequest>,
) -> Result<Json<ExceptionResponse>, AppError> {
    ensure_provider_exists(&state, provider_id).await?;

    // Validated through the domain model before anything is written
    let exception = ScheduleException {
        id: Uuid::new_v4(),
        provider_id,
        date: payload.date,
        reason: payload.reason,
        all_day: payload.all_day,
        start: payload.start,
        end: payload.end,
        created_at: Utc::now(),
    };
    exception.validate()?;

    let row = vetbook_db::repositories::exception::create_exception(
        &state.db_pool,
        provider_id,
        exception.date,
        &exception.reason,
        exception.all_day,
        exception.start.map(|t| t.minutes() as i32),
        exception.end.map(|t| t.minutes() as i32),
    )
    .await
    .map_err(BookingError::Database)?;

    let exception = ScheduleException::try_from(row).map_err(BookingError::Database)?;
    Ok(Json(exception.into()))
}

#[axum::debug_handler]
pub async fn list_exceptions(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Vec<ExceptionResponse>>, AppError> {
    ensure_provider_exists(&state, provider_id).await?;

    let rows = vetbook_db::repositories::exception::list_exceptions(&state.db_pool, provider_id)
        .await
        .map_err(BookingError::Database)?;

    let mut exceptions = Vec::with_capacity(rows.len());
    for row in rows {
        let exception = ScheduleException::try_from(row).map_err(BookingError::Database)?;
        exceptions.push(exception.into());
    }
    Ok(Json(exceptions))
}

#[axum::debug_handler]
pub async fn delete_exception(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = vetbook_db::repositories::exception::delete_exception(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    if !deleted {
        return Err(AppError(BookingError::NotFound(format!(
            "Schedule exception with ID {} not found",
            id
        ))));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_provider_exists(state: &ApiState, provider_id: Uuid) -> Result<(), AppError> {
    vetbook_db::repositories::provider::get_provider_by_id(&state.db_pool, provider_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| {
            AppError(BookingError::NotFound(format!(
                "Provider with ID {} not found",
                provider_id
            )))
        })?;
    Ok(())
}
