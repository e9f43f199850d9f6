use crate::models::{DbPet, DbProvider};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_provider(pool: &Pool<Postgres>, name: &str) -> Result<DbProvider> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating provider: id={}, name={}", id, name);

    let provider = sqlx::query_as::<_, DbProvider>(
        r#"
        INSERT INTO providers (id, name, active, created_at)
        VALUES ($1, $2, TRUE, $3)
        RETURNING id, name, active, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(provider)
}

pub async fn get_provider_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProvider>> {
    let provider = sqlx::query_as::<_, DbProvider>(
        r#"
        SELECT id, name, active, created_at
        FROM providers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(provider)
}

pub async fn list_active_providers(pool: &Pool<Postgres>) -> Result<Vec<DbProvider>> {
    let providers = sqlx::query_as::<_, DbProvider>(
        r#"
        SELECT id, name, active, created_at
        FROM providers
        WHERE active = TRUE
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(providers)
}

pub async fn create_pet(pool: &Pool<Postgres>, owner_id: Uuid, name: &str) -> Result<DbPet> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating pet: id={}, owner_id={}", id, owner_id);

    let pet = sqlx::query_as::<_, DbPet>(
        r#"
        INSERT INTO pets (id, owner_id, name, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, owner_id, name, created_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(pet)
}

pub async fn get_pet_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbPet>> {
    let pet = sqlx::query_as::<_, DbPet>(
        r#"
        SELECT id, owner_id, name, created_at
        FROM pets
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(pet)
}
