use crate::models::DbAvailabilitySnapshot;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use vetbook_core::models::availability::AvailabilitySnapshot;

/// Writes (or rewrites) the cached slot list for one provider/date.
/// Idempotent; safe to re-run for any date independently.
pub async fn upsert_snapshot(
    pool: &Pool<Postgres>,
    snapshot: &AvailabilitySnapshot,
) -> Result<DbAvailabilitySnapshot> {
    let slots = serde_json::to_value(&snapshot.slots)?;

    tracing::debug!(
        "Upserting availability snapshot: provider_id={}, date={}, slots={}",
        snapshot.provider_id,
        snapshot.date,
        snapshot.slots.len()
    );

    let row = sqlx::query_as::<_, DbAvailabilitySnapshot>(
        r#"
        INSERT INTO availability_snapshots (provider_id, date, slots, generated_at, template_version)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (provider_id, date)
        DO UPDATE SET slots = $3, generated_at = $4, template_version = $5
        RETURNING provider_id, date, slots, generated_at, template_version
        "#,
    )
    .bind(snapshot.provider_id)
    .bind(snapshot.date)
    .bind(slots)
    .bind(snapshot.generated_at)
    .bind(snapshot.template_version)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_snapshot(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    date: NaiveDate,
) -> Result<Option<DbAvailabilitySnapshot>> {
    let snapshot = sqlx::query_as::<_, DbAvailabilitySnapshot>(
        r#"
        SELECT provider_id, date, slots, generated_at, template_version
        FROM availability_snapshots
        WHERE provider_id = $1 AND date = $2
        "#,
    )
    .bind(provider_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(snapshot)
}
