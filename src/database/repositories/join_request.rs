use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::get_pool;
use crate::database::models::{JoinRequest, JoinRequestStatus, PendingJoinRequest};

pub async fn insert(
    team_id: Uuid,
    user_id: Uuid,
    message: Option<&str>,
) -> Result<JoinRequest, sqlx::Error> {
    sqlx::query_as::<_, JoinRequest>(
        r#"
        INSERT INTO join_requests (team_id, user_id, message)
        VALUES ($1, $2, $3)
        RETURNING id, team_id, user_id, status, message, created_at, updated_at
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .bind(message)
    .fetch_one(get_pool())
    .await
}

pub async fn find_by_id(id: Uuid) -> Result<Option<JoinRequest>, sqlx::Error> {
    sqlx::query_as::<_, JoinRequest>(
        r#"
        SELECT id, team_id, user_id, status, message, created_at, updated_at
        FROM join_requests
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(get_pool())
    .await
}

pub async fn find_by_team_and_user(
    team_id: Uuid,
    user_id: Uuid,
) -> Result<Option<JoinRequest>, sqlx::Error> {
    sqlx::query_as::<_, JoinRequest>(
        r#"
        SELECT id, team_id, user_id, status, message, created_at, updated_at
        FROM join_requests
        WHERE team_id = $1 AND user_id = $2
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(get_pool())
    .await
}

/// Flip a rejected request back to pending so the user can be reconsidered.
/// The UNIQUE (team_id, user_id) row is reused rather than re-inserted. The
/// status guard makes this a no-op (None) if the request left `rejected`
/// between read and write.
pub async fn reopen(id: Uuid, message: Option<&str>) -> Result<Option<JoinRequest>, sqlx::Error> {
    sqlx::query_as::<_, JoinRequest>(
        r#"
        UPDATE join_requests
        SET status = $1, message = $2, updated_at = NOW()
        WHERE id = $3 AND status = $4
        RETURNING id, team_id, user_id, status, message, created_at, updated_at
        "#,
    )
    .bind(JoinRequestStatus::Pending)
    .bind(message)
    .bind(id)
    .bind(JoinRequestStatus::Rejected)
    .fetch_optional(get_pool())
    .await
}

pub async fn list_pending(team_id: Uuid) -> Result<Vec<PendingJoinRequest>, sqlx::Error> {
    sqlx::query_as::<_, PendingJoinRequest>(
        r#"
        SELECT jr.id, jr.team_id, jr.user_id, u.first_name, u.last_name, u.email,
               jr.message, jr.created_at
        FROM join_requests jr
        JOIN users u ON jr.user_id = u.id
        WHERE jr.team_id = $1 AND jr.status = $2
        ORDER BY jr.created_at
        "#,
    )
    .bind(team_id)
    .bind(JoinRequestStatus::Pending)
    .fetch_all(get_pool())
    .await
}

/// Compare-and-set from `pending`. Returns None when the row is no longer
/// pending, so a reviewer racing another reviewer can never overwrite an
/// approval or rejection that already committed.
pub async fn resolve(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: JoinRequestStatus,
) -> Result<Option<JoinRequest>, sqlx::Error> {
    sqlx::query_as::<_, JoinRequest>(
        r#"
        UPDATE join_requests
        SET status = $1, updated_at = NOW()
        WHERE id = $2 AND status = $3
        RETURNING id, team_id, user_id, status, message, created_at, updated_at
        "#,
    )
    .bind(status)
    .bind(id)
    .bind(JoinRequestStatus::Pending)
    .fetch_optional(&mut **tx)
    .await
}
