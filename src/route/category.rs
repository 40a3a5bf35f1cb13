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

use crate::models::category::{CreateCategoryReq, UpdateCategoryReq};
use crate::ops::category::{
    create_category, delete_category, get_categories, get_category_by_id, update_category,
};
use crate::utils::{errorhandler::AppError, jwt::verify_auth_token};

pub async fn add_category(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(payload): Json<CreateCategoryReq>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized category creation attempt - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;
    if !claims.is_admin {
        warn!("Non-admin user attempted to create category");
        return Err(AppError::forbidden("only administrators have access"));
    }

    let category = create_category(&pg, payload, claims.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": category
        })),
    ))
}

pub async fn read_categories(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    verify_auth_token(TypedHeader(auth))
        .await
        .map_err(|_| AppError::unauthorized("invalid credentials"))?;

    let categories = get_categories(&pg).await?;

    Ok(Json(json!({
        "success": true,
        "data": categories
    })))
}

pub async fn read_category_by_id(
    State(pg): State<PgPool>,
    Path(category_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_auth_token(TypedHeader(auth))
        .await
        .map_err(|_| AppError::unauthorized("invalid credentials"))?;
    if !claims.is_admin {
        return Err(AppError::forbidden("only administrators have access"));
    }

    let category = get_category_by_id(&pg, category_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": category
    })))
}

pub async fn update_category_route(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(payload): Json<UpdateCategoryReq>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized category update attempt - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;
    if !claims.is_admin {
        warn!("Non-admin user attempted to update category: {}", payload.id);
        return Err(AppError::forbidden("only administrators have access"));
    }

    let category_id = update_category(&pg, payload).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "message": "Category updated successfully",
            "category_id": category_id
        }
    })))
}

pub async fn delete_category_route(
    State(pg): State<PgPool>,
    Path(category_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized category deletion attempt - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;
    if !claims.is_admin {
        warn!("Non-admin user attempted to delete category: {}", category_id);
        return Err(AppError::forbidden("only administrators have access"));
    }

    delete_category(&pg, category_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "message": "Category deleted successfully",
            "category_id": category_id
        }
    })))
}
