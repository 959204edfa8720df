use actix_web::{
    web::{Json, Path},
    HttpResponse, Result,
};
use std::collections::HashSet;
use uuid::Uuid;

use crate::database::{
    models::{Fixture, FixtureTeamsheets, TeamsheetInput, TeamsheetView},
    repositories::{fixture as fixture_repo, team as team_repo, teamsheet as teamsheet_repo},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::handlers::teams::require_team_authority;
use crate::services::Claims;

fn validate_participant(fixture: &Fixture, team_id: Uuid) -> Result<(), AppError> {
    if fixture.home_team_id != team_id && fixture.away_team_id != team_id {
        return Err(AppError::Validation(
            "Team is not a participant in this fixture".to_string(),
        ));
    }
    Ok(())
}

/// Submit (or resubmit) a teamsheet. Full replacement: the previous entry
/// set is deleted and the new one inserted in a single transaction, so a
/// resubmission never merges with what was there before.
pub async fn submit_teamsheet(
    claims: Claims,
    path: Path<Uuid>,
    request: Json<TeamsheetInput>,
) -> Result<HttpResponse> {
    let fixture_id = path.into_inner();
    let input = request.into_inner();

    let fixture = fixture_repo::find_by_id(fixture_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Fixture not found".to_string()))?;

    validate_participant(&fixture, input.team_id)?;
    require_team_authority(&claims, input.team_id).await?;

    let player_ids: Vec<Uuid> = input.players.iter().map(|p| p.player_id).collect();
    let distinct: HashSet<Uuid> = player_ids.iter().copied().collect();
    if distinct.len() != player_ids.len() {
        return Err(
            AppError::Validation("Teamsheet lists a player more than once".to_string()).into(),
        );
    }

    // all-or-nothing: one ineligible player rejects the whole sheet
    let eligible = team_repo::count_active_members_among(input.team_id, &player_ids)
        .await
        .map_err(AppError::from)?;
    if eligible as usize != player_ids.len() {
        return Err(AppError::Validation(
            "Teamsheet contains players who are not active members of the team".to_string(),
        )
        .into());
    }

    let team_id = input.team_id;
    let players = input.players;
    let sheet = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            let sheet = teamsheet_repo::upsert_sheet(tx, fixture_id, team_id).await?;
            teamsheet_repo::delete_entries(tx, sheet.id).await?;
            teamsheet_repo::insert_entries(tx, sheet.id, &players).await?;
            Ok(sheet)
        })
    })
    .await?;

    let players = teamsheet_repo::get_players(sheet.id)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(ApiResponse::success(TeamsheetView {
        teamsheet: sheet,
        players,
    })))
}

async fn load_view(fixture_id: Uuid, team_id: Uuid) -> Result<Option<TeamsheetView>, AppError> {
    let Some(sheet) = teamsheet_repo::get_sheet(fixture_id, team_id).await? else {
        return Ok(None);
    };

    let players = teamsheet_repo::get_players(sheet.id).await?;
    Ok(Some(TeamsheetView {
        teamsheet: sheet,
        players,
    }))
}

/// A single team's sheet. "Not submitted yet" is a 404 with a message, not
/// a fault.
pub async fn get_teamsheet(_claims: Claims, path: Path<(Uuid, Uuid)>) -> Result<HttpResponse> {
    let (fixture_id, team_id) = path.into_inner();

    fixture_repo::find_by_id(fixture_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Fixture not found".to_string()))?;

    let view = load_view(fixture_id, team_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Teamsheet has not been submitted for this fixture".to_string())
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// The fixture plus both sides' sheets in one read; either side may still be
/// missing.
pub async fn get_fixture_teamsheets(_claims: Claims, path: Path<Uuid>) -> Result<HttpResponse> {
    let fixture_id = path.into_inner();

    let fixture = fixture_repo::find_by_id(fixture_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Fixture not found".to_string()))?;

    let home = load_view(fixture_id, fixture.home_team_id).await?;
    let away = load_view(fixture_id, fixture.away_team_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(FixtureTeamsheets {
        fixture,
        home,
        away,
    })))
}
