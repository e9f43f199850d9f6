use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create providers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS providers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create pets table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pets (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create weekly_templates table (versioned; edits insert a new version)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weekly_templates (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            provider_id UUID NOT NULL REFERENCES providers(id),
            version INTEGER NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT uniq_template_version UNIQUE (provider_id, version)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create template_days table, one row per weekday (0 = Monday)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS template_days (
            template_id UUID NOT NULL REFERENCES weekly_templates(id),
            weekday SMALLINT NOT NULL CHECK (weekday BETWEEN 0 AND 6),
            active BOOLEAN NOT NULL,
            start_minutes INTEGER NOT NULL,
            end_minutes INTEGER NOT NULL,
            break_start_minutes INTEGER NULL,
            break_end_minutes INTEGER NULL,
            slot_minutes INTEGER NOT NULL,
            buffer_minutes INTEGER NOT NULL,
            max_per_day INTEGER NULL,
            PRIMARY KEY (template_id, weekday),
            CONSTRAINT valid_day_window CHECK (end_minutes > start_minutes)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_exceptions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_exceptions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            provider_id UUID NOT NULL REFERENCES providers(id),
            date DATE NOT NULL,
            reason VARCHAR(255) NOT NULL,
            all_day BOOLEAN NOT NULL,
            start_minutes INTEGER NULL,
            end_minutes INTEGER NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            provider_id UUID NOT NULL REFERENCES providers(id),
            pet_id UUID NOT NULL REFERENCES pets(id),
            date DATE NOT NULL,
            start_minutes INTEGER NOT NULL,
            end_minutes INTEGER NOT NULL,
            status VARCHAR(32) NOT NULL,
            reason VARCHAR(1024) NULL,
            check_in_at TIMESTAMP WITH TIME ZONE NULL,
            check_out_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_appointment_interval CHECK (end_minutes > start_minutes)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // The booking safety net: two concurrent create requests can both pass
    // the application-level conflict check, but only one insert can win this
    // index. Restricted to active statuses so terminal appointments free
    // their interval immediately.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_active_appointment_start
        ON appointments(provider_id, date, start_minutes)
        WHERE status IN ('scheduled', 'confirmed', 'in_progress');
        "#,
    )
    .execute(pool)
    .await?;

    // Create availability_snapshots table (cache, one row per provider/date)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availability_snapshots (
            provider_id UUID NOT NULL REFERENCES providers(id),
            date DATE NOT NULL,
            slots JSONB NOT NULL,
            generated_at TIMESTAMP WITH TIME ZONE NOT NULL,
            template_version INTEGER NOT NULL,
            PRIMARY KEY (provider_id, date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_appointments_provider_date ON appointments(provider_id, date);
        CREATE INDEX IF NOT EXISTS idx_appointments_pet_id ON appointments(pet_id);
        CREATE INDEX IF NOT EXISTS idx_weekly_templates_provider_id ON weekly_templates(provider_id);
        CREATE INDEX IF NOT EXISTS idx_schedule_exceptions_provider_date ON schedule_exceptions(provider_id, date);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
