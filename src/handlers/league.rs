use actix_web::{web::Path, HttpResponse, Result};
use uuid::Uuid;

use crate::database::repositories::{catalog, standings};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

/// Live league table for a (season, sport) scope, recomputed from completed
/// fixtures on every call.
pub async fn get_standings(_claims: Claims, path: Path<(Uuid, Uuid)>) -> Result<HttpResponse> {
    let (season_id, sport_id) = path.into_inner();

    catalog::get_season(season_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Season not found".to_string()))?;

    catalog::get_sport(sport_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Sport not found".to_string()))?;

    let table = standings::compute_standings(season_id, sport_id)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(table)))
}
