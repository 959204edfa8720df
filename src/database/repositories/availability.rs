use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::get_pool;
use crate::database::models::{Availability, FixtureAvailability};

/// Record or revise a player's answer for a fixture. The upsert keeps the
/// one row per (fixture, user) current instead of accumulating history.
pub async fn mark(
    tx: &mut Transaction<'_, Postgres>,
    fixture_id: Uuid,
    user_id: Uuid,
    is_available: bool,
) -> Result<Availability, sqlx::Error> {
    sqlx::query_as::<_, Availability>(
        r#"
        INSERT INTO availability (fixture_id, user_id, is_available)
        VALUES ($1, $2, $3)
        ON CONFLICT (fixture_id, user_id)
            DO UPDATE SET is_available = $3, updated_at = NOW()
        RETURNING id, fixture_id, user_id, is_available, created_at, updated_at
        "#,
    )
    .bind(fixture_id)
    .bind(user_id)
    .bind(is_available)
    .fetch_one(&mut **tx)
    .await
}

/// Revise an existing answer only. None when the player never marked this
/// fixture.
pub async fn update_for_user(
    tx: &mut Transaction<'_, Postgres>,
    fixture_id: Uuid,
    user_id: Uuid,
    is_available: bool,
) -> Result<Option<Availability>, sqlx::Error> {
    sqlx::query_as::<_, Availability>(
        r#"
        UPDATE availability
        SET is_available = $1, updated_at = NOW()
        WHERE fixture_id = $2 AND user_id = $3
        RETURNING id, fixture_id, user_id, is_available, created_at, updated_at
        "#,
    )
    .bind(is_available)
    .bind(fixture_id)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Answers for a fixture with player identity, available players first.
pub async fn for_fixture(fixture_id: Uuid) -> Result<Vec<FixtureAvailability>, sqlx::Error> {
    sqlx::query_as::<_, FixtureAvailability>(
        r#"
        SELECT a.user_id, u.first_name, u.last_name, a.is_available
        FROM availability a
        JOIN users u ON a.user_id = u.id
        WHERE a.fixture_id = $1
        ORDER BY a.is_available DESC, u.last_name, u.first_name
        "#,
    )
    .bind(fixture_id)
    .fetch_all(get_pool())
    .await
}
