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

use crate::models::booking::CreateBookingReq;
use crate::ops::booking::{cancel_booking, create_booking, get_bookings_for_user};
use crate::ops::event::list_events;
use crate::utils::{errorhandler::AppError, jwt::verify_auth_token};

pub async fn reserve_slot(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(payload): Json<CreateBookingReq>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized booking attempt - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;

    let booking = create_booking(&pg, payload.time_slot_id, claims.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": booking
        })),
    ))
}

pub async fn cancel_slot(
    State(pg): State<PgPool>,
    Path(event_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_auth_token(TypedHeader(auth)).await.map_err(|_| {
        warn!("Unauthorized cancellation attempt - invalid token");
        AppError::unauthorized("invalid credentials")
    })?;

    cancel_booking(&pg, event_id, claims.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "message": "Booking cancelled successfully",
            "event_id": event_id,
            "user_id": claims.id
        }
    })))
}

pub async fn my_bookings(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_auth_token(TypedHeader(auth))
        .await
        .map_err(|_| AppError::unauthorized("invalid credentials"))?;

    let bookings = get_bookings_for_user(&pg, claims.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": bookings,
        "user_id": claims.id
    })))
}

pub async fn all_slots(
    State(pg): State<PgPool>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    verify_auth_token(TypedHeader(auth))
        .await
        .map_err(|_| AppError::unauthorized("invalid credentials"))?;

    let slots = list_events(&pg).await?;

    Ok(Json(json!({
        "success": true,
        "data": slots
    })))
}
