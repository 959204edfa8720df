use actix_web::{
    web::{Json, Path},
    HttpResponse, Result,
};
use uuid::Uuid;

use crate::database::{
    models::AvailabilityInput,
    repositories::{availability as availability_repo, fixture as fixture_repo, team as team_repo},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

/// An answer only means something from a player on one of the fixture's
/// rosters.
async fn require_participant(fixture_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let fixture = fixture_repo::find_by_id(fixture_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Fixture not found".to_string()))?;

    if team_repo::is_user_member(fixture.home_team_id, user_id).await?
        || team_repo::is_user_member(fixture.away_team_id, user_id).await?
    {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "Only players on a participating team may mark availability".to_string(),
    ))
}

/// Mark the caller's availability for a fixture. Marking again revises the
/// earlier answer.
pub async fn mark_availability(
    claims: Claims,
    path: Path<Uuid>,
    request: Json<AvailabilityInput>,
) -> Result<HttpResponse> {
    let fixture_id = path.into_inner();
    let user_id = claims.user_id();
    let is_available = request.into_inner().is_available;

    require_participant(fixture_id, user_id).await?;

    let availability = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            availability_repo::mark(tx, fixture_id, user_id, is_available)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(availability)))
}

/// Revise an existing answer. Unlike marking, this refuses to invent a
/// record for a player who never answered.
pub async fn update_availability(
    claims: Claims,
    path: Path<Uuid>,
    request: Json<AvailabilityInput>,
) -> Result<HttpResponse> {
    let fixture_id = path.into_inner();
    let user_id = claims.user_id();
    let is_available = request.into_inner().is_available;

    require_participant(fixture_id, user_id).await?;

    let availability = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            availability_repo::update_for_user(tx, fixture_id, user_id, is_available)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(
                        "Availability has not been marked for this fixture".to_string(),
                    )
                })
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(availability)))
}

/// All answers for a fixture, available players first.
pub async fn get_fixture_availability(
    _claims: Claims,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    let fixture_id = path.into_inner();

    fixture_repo::find_by_id(fixture_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Fixture not found".to_string()))?;

    let answers = availability_repo::for_fixture(fixture_id)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(answers)))
}
