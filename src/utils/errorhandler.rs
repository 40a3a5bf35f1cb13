use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidArgument {
        message: String,
        field: Option<&'static str>,
    },

    #[error("User with ID {user_id} not found")]
    UserNotFound { user_id: i64 },

    #[error("User with email {email} not found")]
    EmailNotFound { email: String },

    #[error("Time slot with ID {event_id} not found")]
    SlotNotFound { event_id: i64 },

    #[error("Category with ID {category_id} not found")]
    CategoryNotFound { category_id: i64 },

    #[error("No booking found for event {event_id}")]
    BookingNotFound { event_id: i64 },

    #[error("Category with name {category_name} already exists")]
    CategoryAlreadyExists { category_name: String },

    #[error("User with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error("You already have a booking for this time slot")]
    DuplicateBooking { event_id: i64, user_id: i64 },

    #[error("This time slot is already booked")]
    SlotAlreadyBooked { event_id: i64 },

    #[error("You can only cancel your own bookings")]
    NotOwner { booking_id: i64, user_id: i64 },

    #[error("Cannot delete category with existing events")]
    CategoryHasEvents { category_id: i64, event_count: i64 },

    #[error("Cannot delete event with existing bookings")]
    EventHasBookings { event_id: i64, booking_count: i64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database operation failed")]
    Storage(#[from] sqlx::Error),

    #[error("Unexpected server error")]
    Unexpected,
}

impl AppError {
    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidArgument {
            message: msg.into(),
            field: None,
        }
    }

    pub fn invalid_field<T: Into<String>>(msg: T, field: &'static str) -> Self {
        AppError::InvalidArgument {
            message: msg.into(),
            field: Some(field),
        }
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        AppError::Forbidden(msg.into())
    }

    /// Stable machine-readable kind; API consumers branch on this.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            AppError::UserNotFound { .. } | AppError::EmailNotFound { .. } => "USER_NOT_FOUND",
            AppError::SlotNotFound { .. } => "SLOT_NOT_FOUND",
            AppError::CategoryNotFound { .. } => "CATEGORY_NOT_FOUND",
            AppError::BookingNotFound { .. } => "BOOKING_NOT_FOUND",
            AppError::CategoryAlreadyExists { .. }
            | AppError::EmailAlreadyExists { .. }
            | AppError::DuplicateBooking { .. } => "ALREADY_EXISTS",
            AppError::SlotAlreadyBooked { .. } => "SLOT_ALREADY_BOOKED",
            AppError::NotOwner { .. } => "NOT_OWNER",
            AppError::CategoryHasEvents { .. } | AppError::EventHasBookings { .. } => {
                "HAS_DEPENDENTS"
            }
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Storage(_) => "STORAGE_FAILURE",
            AppError::Unexpected => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UserNotFound { .. }
            | AppError::EmailNotFound { .. }
            | AppError::SlotNotFound { .. }
            | AppError::CategoryNotFound { .. }
            | AppError::BookingNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::CategoryAlreadyExists { .. }
            | AppError::EmailAlreadyExists { .. }
            | AppError::DuplicateBooking { .. }
            | AppError::SlotAlreadyBooked { .. }
            | AppError::CategoryHasEvents { .. }
            | AppError::EventHasBookings { .. } => StatusCode::CONFLICT,
            AppError::NotOwner { .. } | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) | AppError::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured context for the response body. Internal storage errors
    /// expose nothing.
    pub fn details(&self) -> Value {
        match self {
            AppError::InvalidArgument {
                field: Some(field), ..
            } => json!({ "field": field }),
            AppError::UserNotFound { user_id } => json!({ "user_id": user_id }),
            AppError::EmailNotFound { email } => json!({ "email": email }),
            AppError::SlotNotFound { event_id } => json!({ "time_slot_id": event_id }),
            AppError::CategoryNotFound { category_id } => json!({ "category_id": category_id }),
            AppError::BookingNotFound { event_id } => json!({ "event_id": event_id }),
            AppError::CategoryAlreadyExists { category_name } => {
                json!({ "category_name": category_name })
            }
            AppError::EmailAlreadyExists { email } => json!({ "email": email }),
            AppError::DuplicateBooking { event_id, user_id } => {
                json!({ "time_slot_id": event_id, "user_id": user_id })
            }
            AppError::SlotAlreadyBooked { event_id } => json!({ "time_slot_id": event_id }),
            AppError::NotOwner {
                booking_id,
                user_id,
            } => json!({ "booking_id": booking_id, "user_id": user_id }),
            AppError::CategoryHasEvents {
                category_id,
                event_count,
            } => json!({ "category_id": category_id, "event_count": event_count }),
            AppError::EventHasBookings {
                event_id,
                booking_count,
            } => json!({ "event_id": event_id, "booking_count": booking_count }),
            _ => json!({}),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage(e) = &self {
            error!("storage failure surfaced to client: {}", e);
        }

        let body = Json(json!({
            "success": false,
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
                "details": self.details(),
            }
        }));

        (self.status(), body).into_response()
    }
}

/// Postgres unique-constraint violation (SQLSTATE 23505). A concurrent writer
/// beat us to the row.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Postgres foreign-key violation (SQLSTATE 23503).
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}
