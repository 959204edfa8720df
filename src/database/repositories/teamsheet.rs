use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::get_pool;
use crate::database::models::{Teamsheet, TeamsheetEntryInput, TeamsheetPlayer};

/// Create the sheet on first submission, touch `updated_at` on resubmission.
pub async fn upsert_sheet(
    tx: &mut Transaction<'_, Postgres>,
    fixture_id: Uuid,
    team_id: Uuid,
) -> Result<Teamsheet, sqlx::Error> {
    sqlx::query_as::<_, Teamsheet>(
        r#"
        INSERT INTO teamsheets (fixture_id, team_id)
        VALUES ($1, $2)
        ON CONFLICT (fixture_id, team_id)
            DO UPDATE SET updated_at = NOW()
        RETURNING id, fixture_id, team_id, created_at, updated_at
        "#,
    )
    .bind(fixture_id)
    .bind(team_id)
    .fetch_one(&mut **tx)
    .await
}

pub async fn delete_entries(
    tx: &mut Transaction<'_, Postgres>,
    teamsheet_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM teamsheet_players WHERE teamsheet_id = $1")
        .bind(teamsheet_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn insert_entries(
    tx: &mut Transaction<'_, Postgres>,
    teamsheet_id: Uuid,
    players: &[TeamsheetEntryInput],
) -> Result<(), sqlx::Error> {
    for player in players {
        sqlx::query(
            r#"
            INSERT INTO teamsheet_players (teamsheet_id, player_id, position, is_starter)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(teamsheet_id)
        .bind(player.player_id)
        .bind(&player.position)
        .bind(player.is_starter)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn get_sheet(
    fixture_id: Uuid,
    team_id: Uuid,
) -> Result<Option<Teamsheet>, sqlx::Error> {
    sqlx::query_as::<_, Teamsheet>(
        r#"
        SELECT id, fixture_id, team_id, created_at, updated_at
        FROM teamsheets
        WHERE fixture_id = $1 AND team_id = $2
        "#,
    )
    .bind(fixture_id)
    .bind(team_id)
    .fetch_optional(get_pool())
    .await
}

/// Entries with player display identity, starters first then by name.
pub async fn get_players(teamsheet_id: Uuid) -> Result<Vec<TeamsheetPlayer>, sqlx::Error> {
    sqlx::query_as::<_, TeamsheetPlayer>(
        r#"
        SELECT tp.player_id, u.first_name, u.last_name, tp.position, tp.is_starter
        FROM teamsheet_players tp
        JOIN users u ON tp.player_id = u.id
        WHERE tp.teamsheet_id = $1
        ORDER BY tp.is_starter DESC, u.last_name, u.first_name
        "#,
    )
    .bind(teamsheet_id)
    .fetch_all(get_pool())
    .await
}
