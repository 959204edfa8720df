use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::get_pool;
use crate::database::models::{User, UserRole};

pub async fn find_by_id(id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, first_name, last_name, student_id, role,
               created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(get_pool())
    .await
}

pub async fn find_by_email(email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, first_name, last_name, student_id, role,
               created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(get_pool())
    .await
}

pub async fn create_user(
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
    student_id: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, first_name, last_name, student_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, password_hash, first_name, last_name, student_id, role,
                  created_at, updated_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(student_id)
    .fetch_one(get_pool())
    .await
}

/// Promote a player to captain, touching nothing if the user already holds
/// captain or admin. Idempotent; must run inside the team-creation
/// transaction so the role never changes without the team existing.
pub async fn promote_if_player(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET role = $1, updated_at = NOW()
        WHERE id = $2 AND role = $3
        "#,
    )
    .bind(UserRole::Captain)
    .bind(user_id)
    .bind(UserRole::Player)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
