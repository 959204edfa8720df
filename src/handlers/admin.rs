use actix_web::{
    web::{Json, Path},
    HttpResponse, Result,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::{
    models::{SeasonInput, SportInput},
    repositories::{catalog, team as team_repo},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

fn require_admin(claims: &Claims) -> Result<(), AppError> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

// Catalog data entry. Thin CRUD with no invariants beyond unique names and
// basic shape validation; the competition core only ever reads these rows.

pub async fn create_sport(claims: Claims, request: Json<SportInput>) -> Result<HttpResponse> {
    require_admin(&claims)?;
    let input = request.into_inner();

    if input.min_team_size < 1 || input.min_team_size > input.max_team_size {
        return Err(AppError::Validation("Invalid team size range".to_string()).into());
    }

    let sport = catalog::create_sport(&input)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "A sport with this name already exists"))?;

    Ok(HttpResponse::Created().json(ApiResponse::success(sport)))
}

pub async fn get_sports(_claims: Claims) -> Result<HttpResponse> {
    let sports = catalog::get_all_sports().await.map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(sports)))
}

pub async fn create_season(claims: Claims, request: Json<SeasonInput>) -> Result<HttpResponse> {
    require_admin(&claims)?;
    let input = request.into_inner();

    if input.start_date >= input.end_date {
        return Err(
            AppError::Validation("Season must end after it starts".to_string()).into(),
        );
    }

    let season = catalog::create_season(&input)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "A season with this name already exists"))?;

    Ok(HttpResponse::Created().json(ApiResponse::success(season)))
}

pub async fn get_seasons(_claims: Claims) -> Result<HttpResponse> {
    let seasons = catalog::get_all_seasons().await.map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(seasons)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCaptainInput {
    pub new_captain_id: Uuid,
}

/// Captaincy transfer (admin only). The new captain must already be an
/// active member; team row and both memberships change in one transaction.
pub async fn change_team_captain(
    claims: Claims,
    path: Path<Uuid>,
    request: Json<ChangeCaptainInput>,
) -> Result<HttpResponse> {
    require_admin(&claims)?;
    let team_id = path.into_inner();
    let new_captain_id = request.new_captain_id;

    let team = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            team_repo::update_captain(tx, team_id, new_captain_id)
                .await
                .map_err(|e| match e {
                    sqlx::Error::RowNotFound => AppError::Validation(
                        "New captain must be an active member of the team".to_string(),
                    ),
                    other => AppError::conflict_on_unique(
                        other,
                        "New captain already captains a team in this sport and season",
                    ),
                })?
                .ok_or_else(|| AppError::NotFound("Team not found".to_string()))
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
}

/// Destructive team removal; memberships and join requests cascade at the
/// database level. Reserved for admins or the team's captain.
pub async fn delete_team(claims: Claims, path: Path<Uuid>) -> Result<HttpResponse> {
    let team_id = path.into_inner();

    if !claims.is_admin()
        && !team_repo::is_user_captain(team_id, claims.user_id())
            .await
            .map_err(AppError::from)?
    {
        return Err(AppError::Forbidden(
            "Only the team captain or an admin may delete a team".to_string(),
        )
        .into());
    }

    DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            team_repo::delete_team(tx, team_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Team not found".to_string()))
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Team deleted successfully",
    )))
}
