use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::get_pool;
use crate::database::models::{Team, TeamMember, TeamMemberInfo, TeamRole, UserTeam};

pub async fn insert_team(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    sport_id: Uuid,
    season_id: Uuid,
    captain_id: Uuid,
    description: Option<&str>,
) -> Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        INSERT INTO teams (name, sport_id, season_id, captain_id, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(sport_id)
    .bind(season_id)
    .bind(captain_id)
    .bind(description)
    .fetch_one(&mut **tx)
    .await
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
        .bind(id)
        .fetch_optional(get_pool())
        .await
}

/// Pre-check for the captaincy rule; the UNIQUE (sport_id, season_id,
/// captain_id) constraint is the concurrent safety net.
pub async fn captained_team_exists(
    captain_id: Uuid,
    sport_id: Uuid,
    season_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM teams
        WHERE captain_id = $1 AND sport_id = $2 AND season_id = $3
        "#,
    )
    .bind(captain_id)
    .bind(sport_id)
    .bind(season_id)
    .fetch_one(get_pool())
    .await?;

    Ok(count > 0)
}

/// The single choke point through which every membership is written. Team
/// creation, direct roster additions, and join-request approval all pass
/// through here, so the one-active-team-per-season rule is enforced in one
/// place (by the partial unique index on (season_id, user_id)).
pub async fn insert_membership(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    season_id: Uuid,
    user_id: Uuid,
    role: TeamRole,
) -> Result<TeamMember, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        r#"
        INSERT INTO team_members (team_id, user_id, season_id, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, team_id, user_id, season_id, role, is_active, joined_date
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .bind(season_id)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
}

pub async fn remove_membership(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
        .bind(team_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}

pub async fn get_members(team_id: Uuid) -> Result<Vec<TeamMemberInfo>, sqlx::Error> {
    sqlx::query_as::<_, TeamMemberInfo>(
        r#"
        SELECT u.id AS user_id, u.first_name, u.last_name, u.email,
               tm.role, tm.joined_date
        FROM users u
        JOIN team_members tm ON u.id = tm.user_id
        WHERE tm.team_id = $1 AND tm.is_active
        ORDER BY tm.role, u.last_name, u.first_name
        "#,
    )
    .bind(team_id)
    .fetch_all(get_pool())
    .await
}

pub async fn is_user_captain(team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM teams WHERE id = $1 AND captain_id = $2")
            .bind(team_id)
            .bind(user_id)
            .fetch_one(get_pool())
            .await?;

    Ok(count > 0)
}

pub async fn is_user_member(team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM team_members WHERE team_id = $1 AND user_id = $2 AND is_active",
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_one(get_pool())
    .await?;

    Ok(count > 0)
}

/// Pre-check for the one-active-team-per-season rule; races are caught by
/// the partial unique index at insert time.
pub async fn active_membership_in_season(
    user_id: Uuid,
    season_id: Uuid,
) -> Result<Option<TeamMember>, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT id, team_id, user_id, season_id, role, is_active, joined_date
        FROM team_members
        WHERE user_id = $1 AND season_id = $2 AND is_active
        "#,
    )
    .bind(user_id)
    .bind(season_id)
    .fetch_optional(get_pool())
    .await
}

pub async fn get_user_teams(user_id: Uuid) -> Result<Vec<UserTeam>, sqlx::Error> {
    sqlx::query_as::<_, UserTeam>(
        r#"
        SELECT t.id, t.name, t.sport_id, s.name AS sport_name,
               t.season_id, se.name AS season_name, t.captain_id,
               tm.role AS user_role
        FROM teams t
        JOIN sports s ON t.sport_id = s.id
        JOIN seasons se ON t.season_id = se.id
        JOIN team_members tm ON t.id = tm.team_id
        WHERE tm.user_id = $1 AND tm.is_active
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(get_pool())
    .await
}

/// Active teams a team could face: same sport and season, not itself.
pub async fn find_potential_opponents(team: &Team) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT * FROM teams
        WHERE sport_id = $1 AND season_id = $2 AND id <> $3 AND is_active
        ORDER BY name
        "#,
    )
    .bind(team.sport_id)
    .bind(team.season_id)
    .bind(team.id)
    .fetch_all(get_pool())
    .await
}

/// How many of the given users hold an active membership of the team. Used
/// for all-or-nothing teamsheet eligibility.
pub async fn count_active_members_among(
    team_id: Uuid,
    user_ids: &[Uuid],
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM team_members
        WHERE team_id = $1 AND is_active AND user_id = ANY($2)
        "#,
    )
    .bind(team_id)
    .bind(user_ids)
    .fetch_one(get_pool())
    .await
}

pub async fn update_team(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        UPDATE teams
        SET name = $1, description = $2, updated_at = NOW()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

/// Transfer captaincy: repoint the team, demote the old captain's membership
/// and promote the new one. The new captain must already be a member.
pub async fn update_captain(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    new_captain_id: Uuid,
) -> Result<Option<Team>, sqlx::Error> {
    let team = sqlx::query_as::<_, Team>(
        r#"
        UPDATE teams
        SET captain_id = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(new_captain_id)
    .bind(team_id)
    .fetch_optional(&mut **tx)
    .await?;

    if team.is_none() {
        return Ok(None);
    }

    sqlx::query("UPDATE team_members SET role = $1 WHERE team_id = $2 AND role = $3")
        .bind(TeamRole::Player)
        .bind(team_id)
        .bind(TeamRole::Captain)
        .execute(&mut **tx)
        .await?;

    let updated = sqlx::query(
        "UPDATE team_members SET role = $1 WHERE team_id = $2 AND user_id = $3 AND is_active",
    )
    .bind(TeamRole::Captain)
    .bind(team_id)
    .bind(new_captain_id)
    .execute(&mut **tx)
    .await?;

    if updated.rows_affected() == 0 {
        // not a member; surface as a row miss so the caller rolls back
        return Err(sqlx::Error::RowNotFound);
    }

    Ok(team)
}

pub async fn delete_team(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
