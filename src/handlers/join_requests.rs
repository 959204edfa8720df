use actix_web::{
    web::{Json, Path},
    HttpResponse, Result,
};
use uuid::Uuid;

use crate::database::{
    models::{JoinRequestInput, JoinRequestStatus, TeamRole},
    repositories::{join_request as request_repo, team as team_repo},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::handlers::teams::require_team_authority;
use crate::services::Claims;

/// Ask to join a team. A rejected request is reopened rather than blocking
/// the user forever; a pending or approved one conflicts. The body is
/// optional, so a bare POST creates a message-less request.
pub async fn request_to_join(
    claims: Claims,
    path: Path<Uuid>,
    request: Option<Json<JoinRequestInput>>,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let user_id = claims.user_id();
    let message = request.map(Json::into_inner).unwrap_or_default().message;

    team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    if team_repo::is_user_member(team_id, user_id)
        .await
        .map_err(AppError::from)?
    {
        return Err(
            AppError::Conflict("You are already a member of this team".to_string()).into(),
        );
    }

    let existing = request_repo::find_by_team_and_user(team_id, user_id)
        .await
        .map_err(AppError::from)?;

    let created = match existing {
        Some(prior) if prior.status == JoinRequestStatus::Rejected => {
            request_repo::reopen(prior.id, message.as_deref())
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| {
                    AppError::Conflict(
                        "You have already requested to join this team".to_string(),
                    )
                })?
        }
        Some(_) => {
            return Err(AppError::Conflict(
                "You have already requested to join this team".to_string(),
            )
            .into());
        }
        None => request_repo::insert(team_id, user_id, message.as_deref())
            .await
            .map_err(|e| {
                AppError::conflict_on_unique(
                    e,
                    "You have already requested to join this team",
                )
            })?,
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

/// Pending requests with requester identity, for captain/admin review.
pub async fn list_pending(claims: Claims, path: Path<Uuid>) -> Result<HttpResponse> {
    let team_id = path.into_inner();

    team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    require_team_authority(&claims, team_id).await?;

    let requests = request_repo::list_pending(team_id)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}

/// Approve: membership insert and status flip are one transaction. If the
/// membership violates a uniqueness rule (the user joined another team in
/// this season meanwhile), everything rolls back and the request stays
/// pending.
pub async fn approve(claims: Claims, path: Path<(Uuid, Uuid)>) -> Result<HttpResponse> {
    let (team_id, request_id) = path.into_inner();

    let team = team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    require_team_authority(&claims, team_id).await?;

    let season_id = team.season_id;
    let approved = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            let request = request_repo::find_by_id(request_id)
                .await?
                .filter(|r| r.team_id == team_id)
                .ok_or_else(|| AppError::NotFound("Join request not found".to_string()))?;

            if request.status != JoinRequestStatus::Pending {
                return Err(AppError::Conflict(
                    "Join request has already been resolved".to_string(),
                ));
            }

            team_repo::insert_membership(tx, team_id, season_id, request.user_id, TeamRole::Player)
                .await
                .map_err(|e| {
                    AppError::conflict_on_unique(
                        e,
                        "User already belongs to a team in this season",
                    )
                })?;

            request_repo::resolve(tx, request_id, JoinRequestStatus::Approved)
                .await?
                .ok_or_else(|| {
                    AppError::Conflict("Join request has already been resolved".to_string())
                })
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(approved)))
}

/// Reject: terminal status flip, no membership side effect.
pub async fn reject(claims: Claims, path: Path<(Uuid, Uuid)>) -> Result<HttpResponse> {
    let (team_id, request_id) = path.into_inner();

    team_repo::find_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

    require_team_authority(&claims, team_id).await?;

    let rejected = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            let request = request_repo::find_by_id(request_id)
                .await?
                .filter(|r| r.team_id == team_id)
                .ok_or_else(|| AppError::NotFound("Join request not found".to_string()))?;

            if request.status != JoinRequestStatus::Pending {
                return Err(AppError::Conflict(
                    "Join request has already been resolved".to_string(),
                ));
            }

            request_repo::resolve(tx, request_id, JoinRequestStatus::Rejected)
                .await?
                .ok_or_else(|| {
                    AppError::Conflict("Join request has already been resolved".to_string())
                })
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(rejected)))
}
