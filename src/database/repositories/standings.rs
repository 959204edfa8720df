use uuid::Uuid;

use crate::database::get_pool;
use crate::database::models::standings::{accumulate, rank, StandingRow, TeamRecord};
use crate::database::repositories::fixture;

/// Teams in a (season, sport) scope in a deterministic order, so standings
/// ties beyond goal difference are stable across runs.
pub async fn teams_in_scope(
    season_id: Uuid,
    sport_id: Uuid,
) -> Result<Vec<TeamRecord>, sqlx::Error> {
    sqlx::query_as::<_, TeamRecord>(
        r#"
        SELECT id, name FROM teams
        WHERE season_id = $1 AND sport_id = $2
        ORDER BY name, id
        "#,
    )
    .bind(season_id)
    .bind(sport_id)
    .fetch_all(get_pool())
    .await
}

/// Live standings: no persisted table, recomputed from completed fixtures on
/// every call.
pub async fn compute_standings(
    season_id: Uuid,
    sport_id: Uuid,
) -> Result<Vec<StandingRow>, sqlx::Error> {
    let teams = teams_in_scope(season_id, sport_id).await?;
    let fixtures = fixture::completed_for_scope(season_id, sport_id).await?;

    let mut rows = accumulate(&teams, &fixtures);
    rank(&mut rows);
    Ok(rows)
}
