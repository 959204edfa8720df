use uuid::Uuid;

use crate::database::get_pool;
use crate::database::models::{Season, SeasonInput, Sport, SportInput};

// The catalog is read-only for the competition core; sports and seasons are
// created through the admin surface.

pub async fn resolve_sport_by_name(name: &str) -> Result<Option<Sport>, sqlx::Error> {
    sqlx::query_as::<_, Sport>(
        r#"
        SELECT id, name, description, min_team_size, max_team_size, is_active, created_at
        FROM sports
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(get_pool())
    .await
}

pub async fn resolve_season_by_name(name: &str) -> Result<Option<Season>, sqlx::Error> {
    sqlx::query_as::<_, Season>(
        r#"
        SELECT id, name, start_date, end_date, is_active, created_at
        FROM seasons
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(get_pool())
    .await
}

pub async fn get_sport(id: Uuid) -> Result<Option<Sport>, sqlx::Error> {
    sqlx::query_as::<_, Sport>(
        r#"
        SELECT id, name, description, min_team_size, max_team_size, is_active, created_at
        FROM sports
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(get_pool())
    .await
}

pub async fn get_season(id: Uuid) -> Result<Option<Season>, sqlx::Error> {
    sqlx::query_as::<_, Season>(
        r#"
        SELECT id, name, start_date, end_date, is_active, created_at
        FROM seasons
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(get_pool())
    .await
}

pub async fn get_all_sports() -> Result<Vec<Sport>, sqlx::Error> {
    sqlx::query_as::<_, Sport>(
        r#"
        SELECT id, name, description, min_team_size, max_team_size, is_active, created_at
        FROM sports
        ORDER BY name
        "#,
    )
    .fetch_all(get_pool())
    .await
}

pub async fn get_all_seasons() -> Result<Vec<Season>, sqlx::Error> {
    sqlx::query_as::<_, Season>(
        r#"
        SELECT id, name, start_date, end_date, is_active, created_at
        FROM seasons
        ORDER BY start_date DESC
        "#,
    )
    .fetch_all(get_pool())
    .await
}

pub async fn create_sport(input: &SportInput) -> Result<Sport, sqlx::Error> {
    sqlx::query_as::<_, Sport>(
        r#"
        INSERT INTO sports (name, description, min_team_size, max_team_size)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, description, min_team_size, max_team_size, is_active, created_at
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.min_team_size)
    .bind(input.max_team_size)
    .fetch_one(get_pool())
    .await
}

pub async fn create_season(input: &SeasonInput) -> Result<Season, sqlx::Error> {
    sqlx::query_as::<_, Season>(
        r#"
        INSERT INTO seasons (name, start_date, end_date)
        VALUES ($1, $2, $3)
        RETURNING id, name, start_date, end_date, is_active, created_at
        "#,
    )
    .bind(&input.name)
    .bind(input.start_date)
    .bind(input.end_date)
    .fetch_one(get_pool())
    .await
}
