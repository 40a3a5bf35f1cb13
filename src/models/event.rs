use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use time::OffsetDateTime;

/// Cached booking flag on the event row. Updated imperatively by the booking
/// operations rather than derived from booking existence on read.
#[derive(Debug, Type, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[sqlx(type_name = "event_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[sqlx(rename = "NOT_BOOKED")]
    NotBooked,
    #[sqlx(rename = "BOOKED")]
    Booked,
}

#[derive(Serialize, Debug, FromRow)]
pub struct Event {
    pub id: i64,
    pub event_name: String,
    pub description: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: EventStatus,
    pub category_id: Option<i64>,
    pub created_by: i64,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
}

/// The initial status comes from the caller, not forced to NOT_BOOKED.
#[derive(Deserialize)]
pub struct CreateEventReq {
    pub event_name: String,
    pub description: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: EventStatus,
    pub category_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateEventReq {
    pub id: i64,
    pub event_name: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub category_id: Option<i64>,
}

/// Listing row: the booking owner's id is surfaced only while the slot is
/// booked, and the category name only when a category is linked.
#[derive(Serialize, Debug, FromRow)]
pub struct EventSlot {
    pub status: EventStatus,
    pub user_id: Option<i64>,
    pub id: i64,
    pub category_name: Option<String>,
    pub event_name: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub description: String,
}
