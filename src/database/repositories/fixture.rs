use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::get_pool;
use crate::database::models::{Fixture, FixtureStatus};

pub async fn insert(
    season_id: Uuid,
    sport_id: Uuid,
    home_team_id: Uuid,
    away_team_id: Uuid,
    fixture_date: Option<DateTime<Utc>>,
) -> Result<Fixture, sqlx::Error> {
    sqlx::query_as::<_, Fixture>(
        r#"
        INSERT INTO fixtures (season_id, sport_id, home_team_id, away_team_id, fixture_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(season_id)
    .bind(sport_id)
    .bind(home_team_id)
    .bind(away_team_id)
    .bind(fixture_date)
    .fetch_one(get_pool())
    .await
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Fixture>, sqlx::Error> {
    sqlx::query_as::<_, Fixture>("SELECT * FROM fixtures WHERE id = $1")
        .bind(id)
        .fetch_optional(get_pool())
        .await
}

pub async fn find_all() -> Result<Vec<Fixture>, sqlx::Error> {
    sqlx::query_as::<_, Fixture>("SELECT * FROM fixtures ORDER BY fixture_date DESC NULLS LAST")
        .fetch_all(get_pool())
        .await
}

pub async fn find_by_team(team_id: Uuid) -> Result<Vec<Fixture>, sqlx::Error> {
    sqlx::query_as::<_, Fixture>(
        r#"
        SELECT * FROM fixtures
        WHERE home_team_id = $1 OR away_team_id = $1
        ORDER BY fixture_date DESC NULLS LAST
        "#,
    )
    .bind(team_id)
    .fetch_all(get_pool())
    .await
}

/// Compare-and-set confirmation. The status guard refuses a fixture that
/// completed in the meantime (None), so a recorded result can never be
/// rolled back to `confirmed`.
pub async fn confirm(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Fixture>, sqlx::Error> {
    sqlx::query_as::<_, Fixture>(
        r#"
        UPDATE fixtures
        SET status = $1, updated_at = NOW()
        WHERE id = $2 AND status <> $3
        RETURNING *
        "#,
    )
    .bind(FixtureStatus::Confirmed)
    .bind(id)
    .bind(FixtureStatus::Completed)
    .fetch_optional(&mut **tx)
    .await
}

/// Write both scores and force `completed`. The authoritative terminal
/// transition; standings pick the fixture up from this point on.
pub async fn submit_result(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    home_score: i32,
    away_score: i32,
) -> Result<Fixture, sqlx::Error> {
    sqlx::query_as::<_, Fixture>(
        r#"
        UPDATE fixtures
        SET home_team_score = $1, away_team_score = $2, status = $3, updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(home_score)
    .bind(away_score)
    .bind(FixtureStatus::Completed)
    .bind(id)
    .fetch_one(&mut **tx)
    .await
}

pub async fn completed_for_scope(
    season_id: Uuid,
    sport_id: Uuid,
) -> Result<Vec<Fixture>, sqlx::Error> {
    sqlx::query_as::<_, Fixture>(
        r#"
        SELECT * FROM fixtures
        WHERE season_id = $1 AND sport_id = $2 AND status = $3
        ORDER BY created_at, id
        "#,
    )
    .bind(season_id)
    .bind(sport_id)
    .bind(FixtureStatus::Completed)
    .fetch_all(get_pool())
    .await
}

/// Refresh a team's denormalized result counters from its completed
/// fixtures. Full recomputation, so correcting a submitted result converges
/// instead of double-counting. Runs inside the result-submission
/// transaction.
pub async fn refresh_team_counters(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE teams t
        SET matches_played = agg.played,
            wins = agg.wins,
            losses = agg.losses,
            draws = agg.draws,
            goals_for = agg.goals_for,
            goals_against = agg.goals_against,
            points = agg.wins * 3 + agg.draws,
            updated_at = NOW()
        FROM (
            SELECT
                COUNT(f.id) AS played,
                COALESCE(SUM(CASE WHEN (f.home_team_id = $1 AND f.home_team_score > f.away_team_score)
                                    OR (f.away_team_id = $1 AND f.away_team_score > f.home_team_score)
                             THEN 1 ELSE 0 END), 0) AS wins,
                COALESCE(SUM(CASE WHEN (f.home_team_id = $1 AND f.home_team_score < f.away_team_score)
                                    OR (f.away_team_id = $1 AND f.away_team_score < f.home_team_score)
                             THEN 1 ELSE 0 END), 0) AS losses,
                COALESCE(SUM(CASE WHEN f.home_team_score = f.away_team_score THEN 1 ELSE 0 END), 0) AS draws,
                COALESCE(SUM(CASE WHEN f.home_team_id = $1 THEN f.home_team_score ELSE f.away_team_score END), 0) AS goals_for,
                COALESCE(SUM(CASE WHEN f.home_team_id = $1 THEN f.away_team_score ELSE f.home_team_score END), 0) AS goals_against
            FROM fixtures f
            WHERE (f.home_team_id = $1 OR f.away_team_id = $1) AND f.status = $2
        ) agg
        WHERE t.id = $1
        "#,
    )
    .bind(team_id)
    .bind(FixtureStatus::Completed)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
