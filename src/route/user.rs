use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::warn;

use crate::models::user::{LoginRequest, RegisterUser};
use crate::ops::user::{get_user, get_user_by_email, get_users, login_user, register_user};
use crate::utils::{errorhandler::AppError, jwt::verify_auth_token};

pub async fn register(
    State(pg): State<PgPool>,
    Json(payload): Json<RegisterUser>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = register_user(&pg, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": user
        })),
    ))
}

pub async fn login(
    State(pg): State<PgPool>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let token = login_user(&pg, payload).await?;

    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer"
    })))
}

pub async fn me(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized profile request - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;

    let user = get_user_by_email(&pg, &claims.sub)
        .await?
        .ok_or(AppError::EmailNotFound { email: claims.sub })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "id": user.id,
            "email": user.email,
            "firstname": user.firstname,
            "lastname": user.lastname,
            "is_verified": user.is_verified,
            "is_admin": user.is_admin,
            "created_at": user.created_at
        }
    })))
}

pub async fn read_users(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    verify_auth_token(TypedHeader(auth))
        .await
        .map_err(|_| AppError::unauthorized("invalid credentials"))?;

    let users = get_users(&pg).await?;

    Ok(Json(json!({
        "success": true,
        "data": users
    })))
}

pub async fn read_user(
    State(pg): State<PgPool>,
    Path(user_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    verify_auth_token(TypedHeader(auth))
        .await
        .map_err(|_| AppError::unauthorized("invalid credentials"))?;

    let user = get_user(&pg, user_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": user
    })))
}
