use actix_web::{
    web::{Json, Path},
    HttpResponse, Result,
};
use uuid::Uuid;

use crate::database::{
    models::{FixtureInput, FixtureStatus, ResultInput, Team},
    repositories::{fixture as fixture_repo, team as team_repo},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

async fn load_team_in_scope(
    team_id: Uuid,
    season_id: Uuid,
    sport_id: Uuid,
    side: &str,
) -> Result<Team, AppError> {
    let team = team_repo::find_by_id(team_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} team not found", side)))?;

    if team.season_id != season_id || team.sport_id != sport_id {
        return Err(AppError::Validation(format!(
            "{} team does not compete in this sport and season",
            side
        )));
    }

    Ok(team)
}

/// Gate for fixture mutations: captain of either participating team, or an
/// admin.
async fn require_fixture_authority(
    claims: &Claims,
    home_team_id: Uuid,
    away_team_id: Uuid,
) -> Result<(), AppError> {
    if claims.is_admin() {
        return Ok(());
    }
    if team_repo::is_user_captain(home_team_id, claims.user_id()).await?
        || team_repo::is_user_captain(away_team_id, claims.user_id()).await?
    {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Only a participating team's captain or an admin may do this".to_string(),
    ))
}

pub async fn create_fixture(claims: Claims, request: Json<FixtureInput>) -> Result<HttpResponse> {
    let input = request.into_inner();

    if input.home_team_id == input.away_team_id {
        return Err(AppError::Validation(
            "Home and away team must be different".to_string(),
        )
        .into());
    }

    let home = load_team_in_scope(input.home_team_id, input.season_id, input.sport_id, "Home")
        .await?;
    load_team_in_scope(input.away_team_id, input.season_id, input.sport_id, "Away").await?;

    if !claims.is_admin() && home.captain_id != claims.user_id() {
        return Err(AppError::Forbidden(
            "Only the home team's captain or an admin may propose a fixture".to_string(),
        )
        .into());
    }

    let fixture = fixture_repo::insert(
        input.season_id,
        input.sport_id,
        input.home_team_id,
        input.away_team_id,
        input.fixture_date,
    )
    .await
    .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(ApiResponse::success(fixture)))
}

pub async fn get_all_fixtures(_claims: Claims) -> Result<HttpResponse> {
    let fixtures = fixture_repo::find_all().await.map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(fixtures)))
}

pub async fn get_fixture(_claims: Claims, path: Path<Uuid>) -> Result<HttpResponse> {
    let fixture = fixture_repo::find_by_id(path.into_inner())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Fixture not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(fixture)))
}

pub async fn get_fixtures_by_team(_claims: Claims, path: Path<Uuid>) -> Result<HttpResponse> {
    let team_id = path.into_inner();

    team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    let fixtures = fixture_repo::find_by_team(team_id)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(fixtures)))
}

/// Active teams in the same sport and season a team could be matched
/// against.
pub async fn get_potential_opponents(_claims: Claims, path: Path<Uuid>) -> Result<HttpResponse> {
    let team_id = path.into_inner();

    let team = team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    let opponents = team_repo::find_potential_opponents(&team)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(opponents)))
}

pub async fn confirm_fixture(claims: Claims, path: Path<Uuid>) -> Result<HttpResponse> {
    let fixture_id = path.into_inner();

    let fixture = fixture_repo::find_by_id(fixture_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Fixture not found".to_string()))?;

    require_fixture_authority(&claims, fixture.home_team_id, fixture.away_team_id).await?;

    if !fixture.status.can_transition(FixtureStatus::Confirmed) {
        return Err(AppError::Validation(format!(
            "Cannot confirm a fixture in status '{}'",
            fixture.status
        ))
        .into());
    }

    let confirmed = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            fixture_repo::confirm(tx, fixture_id)
                .await?
                .ok_or_else(|| {
                    AppError::Conflict("Fixture has already been completed".to_string())
                })
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(confirmed)))
}

/// Record a result. One transaction writes the scores, forces `completed`,
/// and refreshes both teams' denormalized counters so the teams table never
/// drifts from the fixture log.
pub async fn submit_result(
    claims: Claims,
    path: Path<Uuid>,
    request: Json<ResultInput>,
) -> Result<HttpResponse> {
    let fixture_id = path.into_inner();
    let input = request.into_inner();

    if input.home_team_score < 0 || input.away_team_score < 0 {
        return Err(AppError::Validation("Scores cannot be negative".to_string()).into());
    }

    let fixture = fixture_repo::find_by_id(fixture_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Fixture not found".to_string()))?;

    require_fixture_authority(&claims, fixture.home_team_id, fixture.away_team_id).await?;

    let (home_team_id, away_team_id) = (fixture.home_team_id, fixture.away_team_id);
    let completed = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            let completed = fixture_repo::submit_result(
                tx,
                fixture_id,
                input.home_team_score,
                input.away_team_score,
            )
            .await?;

            fixture_repo::refresh_team_counters(tx, home_team_id).await?;
            fixture_repo::refresh_team_counters(tx, away_team_id).await?;

            Ok(completed)
        })
    })
    .await?;

    log::info!(
        "Result recorded for fixture {}: {} - {}",
        fixture_id,
        input.home_team_score,
        input.away_team_score
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(completed)))
}
