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

use crate::models::event::{CreateEventReq, UpdateEventReq};
use crate::ops::event::{create_event, delete_event, get_event_by_id, update_event};
use crate::utils::{errorhandler::AppError, jwt::verify_auth_token};

pub async fn add_event(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(payload): Json<CreateEventReq>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized event creation attempt - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;
    if !claims.is_admin {
        warn!("Non-admin user attempted to create event");
        return Err(AppError::forbidden("only administrators have access"));
    }

    let event = create_event(&pg, payload, claims.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": event
        })),
    ))
}

pub async fn read_event_by_id(
    State(pg): State<PgPool>,
    Path(event_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    verify_auth_token(TypedHeader(auth))
        .await
        .map_err(|_| AppError::unauthorized("invalid credentials"))?;

    let event = get_event_by_id(&pg, event_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": event
    })))
}

pub async fn update_event_route(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(payload): Json<UpdateEventReq>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized event update attempt - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;
    if !claims.is_admin {
        warn!("Non-admin user attempted to update event: {}", payload.id);
        return Err(AppError::forbidden("only administrators have access"));
    }

    let event_id = update_event(&pg, payload).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "message": "Event updated successfully",
            "event_id": event_id
        }
    })))
}

pub async fn delete_event_route(
    State(pg): State<PgPool>,
    Path(event_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized event deletion attempt - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;
    if !claims.is_admin {
        warn!("Non-admin user attempted to delete event: {}", event_id);
        return Err(AppError::forbidden("only administrators have access"));
    }

    delete_event(&pg, event_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "message": "Event deleted successfully",
            "event_id": event_id
        }
    })))
}
