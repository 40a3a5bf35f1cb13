use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use time::OffsetDateTime;

use crate::models::event::EventStatus;

#[derive(Serialize, Deserialize, Debug, FromRow)]
pub struct Booking {
    pub id: i64,
    pub created_by: i64,
    pub event_id: i64,
    pub booked_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

#[derive(Deserialize)]
pub struct CreateBookingReq {
    pub time_slot_id: i64,
}

/// Denormalized row for a user's booking history: booking, event, category
/// and user identity flattened together.
#[derive(Serialize, Debug, FromRow)]
pub struct UserBookingRow {
    pub status: EventStatus,
    pub user_id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub category_name: Option<String>,
    pub event_name: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub description: String,
    pub booking_id: i64,
    pub booking_date: OffsetDateTime,
}
