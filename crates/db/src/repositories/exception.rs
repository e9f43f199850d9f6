use crate::models::DbScheduleException;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_exception(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    date: NaiveDate,
    reason: &str,
    all_day: bool,
    start_minutes: Option<i32>,
    end_minutes: Option<i32>,
) -> Result<DbScheduleException> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating schedule exception: provider_id={}, date={}, all_day={}",
        provider_id,
        date,
        all_day
    );

    let exception = sqlx::query_as::<_, DbScheduleException>(
        r#"
        INSERT INTO schedule_exceptions (
            id, provider_id, date, reason, all_day, start_minutes, end_minutes, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, provider_id, date, reason, all_day, start_minutes, end_minutes, created_at
        "#,
    )
    .bind(id)
    .bind(provider_id)
    .bind(date)
    .bind(reason)
    .bind(all_day)
    .bind(start_minutes)
    .bind(end_minutes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(exception)
}

/// The exception governing one provider/date, if any. The most recently
/// added entry wins when several were recorded for the same date.
pub async fn get_exception_for_date(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    date: NaiveDate,
) -> Result<Option<DbScheduleException>> {
    let exception = sqlx::query_as::<_, DbScheduleException>(
        r#"
        SELECT id, provider_id, date, reason, all_day, start_minutes, end_minutes, created_at
        FROM schedule_exceptions
        WHERE provider_id = $1 AND date = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(provider_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(exception)
}

pub async fn list_exceptions(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
) -> Result<Vec<DbScheduleException>> {
    let exceptions = sqlx::query_as::<_, DbScheduleException>(
        r#"
        SELECT id, provider_id, date, reason, all_day, start_minutes, end_minutes, created_at
        FROM schedule_exceptions
        WHERE provider_id = $1
        ORDER BY date ASC
        "#,
    )
    .bind(provider_id)
    .fetch_all(pool)
    .await?;

    Ok(exceptions)
}

/// Removes an exception entry. Returns false when no row matched.
pub async fn delete_exception(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM schedule_exceptions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
