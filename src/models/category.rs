use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use time::OffsetDateTime;

#[derive(Serialize, Debug, FromRow)]
pub struct Category {
    pub id: i64,
    pub category_name: String,
    pub color: String,
    pub created_by: i64,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
}

#[derive(Deserialize)]
pub struct CreateCategoryReq {
    pub category_name: String,
    pub color: String,
}

#[derive(Deserialize)]
pub struct UpdateCategoryReq {
    pub id: i64,
    pub category_name: Option<String>,
    pub color: Option<String>,
}

/// Listing row: each category with the number of events still pointing at it.
#[derive(Serialize, Debug, FromRow)]
pub struct CategorySummary {
    pub id: i64,
    pub category_name: String,
    pub color: String,
    pub user_id: i64,
    pub event_count: i64,
}
