use crate::models::{DbTemplateDay, DbWeeklyTemplate, assemble_template};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use vetbook_core::models::schedule::{DayConfig, WeeklyTemplate};

/// Inserts a new template version for the provider. Previous versions are
/// kept; readers take the highest version.
pub async fn set_template(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    days: &[DayConfig],
) -> Result<WeeklyTemplate> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let next_version = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT COALESCE(MAX(version), 0) + 1
        FROM weekly_templates
        WHERE provider_id = $1
        "#,
    )
    .bind(provider_id)
    .fetch_one(&mut *tx)
    .await?;

    tracing::debug!(
        "Creating template version {} for provider {}",
        next_version,
        provider_id
    );

    let header = sqlx::query_as::<_, DbWeeklyTemplate>(
        r#"
        INSERT INTO weekly_templates (id, provider_id, version, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, provider_id, version, created_at
        "#,
    )
    .bind(id)
    .bind(provider_id)
    .bind(next_version)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let mut day_rows = Vec::with_capacity(days.len());
    for (weekday, day) in days.iter().enumerate() {
        let row = sqlx::query_as::<_, DbTemplateDay>(
            r#"
            INSERT INTO template_days (
                template_id, weekday, active, start_minutes, end_minutes,
                break_start_minutes, break_end_minutes, slot_minutes,
                buffer_minutes, max_per_day
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING template_id, weekday, active, start_minutes, end_minutes,
                      break_start_minutes, break_end_minutes, slot_minutes,
                      buffer_minutes, max_per_day
            "#,
        )
        .bind(id)
        .bind(weekday as i16)
        .bind(day.active)
        .bind(day.start.minutes() as i32)
        .bind(day.end.minutes() as i32)
        .bind(day.break_start.map(|t| t.minutes() as i32))
        .bind(day.break_end.map(|t| t.minutes() as i32))
        .bind(day.slot_minutes as i32)
        .bind(day.buffer_minutes as i32)
        .bind(day.max_per_day.map(|m| m as i32))
        .fetch_one(&mut *tx)
        .await?;
        day_rows.push(row);
    }

    tx.commit().await?;

    assemble_template(header, day_rows)
}

/// The provider's current template (highest version), if any was ever set.
pub async fn get_latest_template(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
) -> Result<Option<WeeklyTemplate>> {
    let header = sqlx::query_as::<_, DbWeeklyTemplate>(
        r#"
        SELECT id, provider_id, version, created_at
        FROM weekly_templates
        WHERE provider_id = $1
        ORDER BY version DESC
        LIMIT 1
        "#,
    )
    .bind(provider_id)
    .fetch_optional(pool)
    .await?;

    let Some(header) = header else {
        return Ok(None);
    };

    let days = sqlx::query_as::<_, DbTemplateDay>(
        r#"
        SELECT template_id, weekday, active, start_minutes, end_minutes,
               break_start_minutes, break_end_minutes, slot_minutes,
               buffer_minutes, max_per_day
        FROM template_days
        WHERE template_id = $1
        ORDER BY weekday ASC
        "#,
    )
    .bind(header.id)
    .fetch_all(pool)
    .await?;

    assemble_template(header, days).map(Some)
}
