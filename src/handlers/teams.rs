use actix_web::{
    web::{Json, Path},
    HttpResponse, Result,
};
use uuid::Uuid;

use crate::database::{
    models::{AddMemberInput, CreateTeamInput, TeamRole, TeamWithMembers, UpdateTeamInput},
    repositories::{catalog, team as team_repo, user as user_repo},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

/// Captain-or-admin gate for team management endpoints.
pub async fn require_team_authority(claims: &Claims, team_id: Uuid) -> Result<(), AppError> {
    if claims.is_admin() {
        return Ok(());
    }
    if team_repo::is_user_captain(team_id, claims.user_id()).await? {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Only the team captain or an admin may manage this team".to_string(),
    ))
}

/// Create a team. One transaction covers the team row, the requester's
/// player-to-captain promotion, and the captain's own membership; any
/// failure leaves none of the three behind.
pub async fn create_team(claims: Claims, request: Json<CreateTeamInput>) -> Result<HttpResponse> {
    let input = request.into_inner();
    let requester_id = claims.user_id();

    let sport = catalog::resolve_sport_by_name(&input.sport_name)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Sport '{}' not found", input.sport_name)))?;

    let season = catalog::resolve_season_by_name(&input.season_name)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Season '{}' not found", input.season_name)))?;

    if !claims.is_admin()
        && team_repo::captained_team_exists(requester_id, sport.id, season.id)
            .await
            .map_err(AppError::from)?
    {
        return Err(AppError::Conflict(
            "You are already the captain of a team in this sport for this season".to_string(),
        )
        .into());
    }

    let team = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let team = team_repo::insert_team(
                tx,
                &input.name,
                sport.id,
                season.id,
                requester_id,
                input.description.as_deref(),
            )
            .await
            .map_err(|e| {
                AppError::conflict_on_unique(
                    e,
                    "Team name is taken, or you already captain a team in this sport and season",
                )
            })?;

            user_repo::promote_if_player(tx, requester_id).await?;

            team_repo::insert_membership(tx, team.id, season.id, requester_id, TeamRole::Captain)
                .await
                .map_err(|e| {
                    AppError::conflict_on_unique(
                        e,
                        "You already hold an active team membership for this season",
                    )
                })?;

            Ok(team)
        })
    })
    .await?;

    log::info!("Team '{}' created by {}", team.name, requester_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(team)))
}

/// Teams the authenticated user belongs to, with sport and season names.
pub async fn get_my_teams(claims: Claims) -> Result<HttpResponse> {
    let teams = team_repo::get_user_teams(claims.user_id())
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(teams)))
}

pub async fn get_team(_claims: Claims, path: Path<Uuid>) -> Result<HttpResponse> {
    let team_id = path.into_inner();

    let team = team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    let members = team_repo::get_members(team_id)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(TeamWithMembers { team, members })))
}

/// Rename a team or change its description. Scope, captaincy and results
/// are out of reach here.
pub async fn update_team(
    claims: Claims,
    path: Path<Uuid>,
    request: Json<UpdateTeamInput>,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let input = request.into_inner();

    require_team_authority(&claims, team_id).await?;

    let team = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            team_repo::update_team(tx, team_id, &input.name, input.description.as_deref())
                .await
                .map_err(|e| {
                    AppError::conflict_on_unique(
                        e,
                        "A team with this name already exists in this sport and season",
                    )
                })?
                .ok_or_else(|| AppError::NotFound("Team not found".to_string()))
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
}

/// Add a member directly (captain/admin path). The season-wide membership
/// rule is pre-checked here and enforced for real by the partial unique
/// index behind the membership choke point.
pub async fn add_member(
    claims: Claims,
    path: Path<Uuid>,
    request: Json<AddMemberInput>,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();

    let team = team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    require_team_authority(&claims, team_id).await?;

    let user = user_repo::find_by_email(&request.email)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if team_repo::is_user_member(team_id, user.id)
        .await
        .map_err(AppError::from)?
    {
        return Err(
            AppError::Conflict("User is already a member of this team".to_string()).into(),
        );
    }

    if team_repo::active_membership_in_season(user.id, team.season_id)
        .await
        .map_err(AppError::from)?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User already belongs to a team in this season".to_string(),
        )
        .into());
    }

    let user_id = user.id;
    let season_id = team.season_id;
    let member = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            team_repo::insert_membership(tx, team_id, season_id, user_id, TeamRole::Player)
                .await
                .map_err(|e| {
                    AppError::conflict_on_unique(
                        e,
                        "User already belongs to a team in this season",
                    )
                })
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(member)))
}

pub async fn remove_member(claims: Claims, path: Path<(Uuid, Uuid)>) -> Result<HttpResponse> {
    let (team_id, user_id) = path.into_inner();

    let team = team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    require_team_authority(&claims, team_id).await?;

    if team.captain_id == user_id {
        return Err(AppError::Validation(
            "Cannot remove the team captain; transfer captaincy first".to_string(),
        )
        .into());
    }

    DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            team_repo::remove_membership(tx, team_id, user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Member removed successfully",
    )))
}
