use actix_web::{web, HttpResponse, Result};

use crate::database::models::{CreateUserInput, LoginInput, UserInfo};
use crate::database::repositories::user as user_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth;
use crate::services::Claims;

pub async fn register(request: web::Json<CreateUserInput>) -> Result<HttpResponse> {
    let response = auth::register(request.into_inner()).await.map_err(|e| {
        log::warn!("Failed to register user: {}", e);
        AppError::Validation(e.to_string())
    })?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

pub async fn login(request: web::Json<LoginInput>) -> Result<HttpResponse> {
    let response = auth::login(request.into_inner())
        .await
        .map_err(|_| AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn me(claims: Claims) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(claims.user_id())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}
