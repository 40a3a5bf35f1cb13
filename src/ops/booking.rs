use sqlx::PgPool;
use tracing::warn;

use crate::models::booking::{Booking, UserBookingRow};
use crate::models::event::EventStatus;
use crate::ops::user::user_exists;
use crate::utils::errorhandler::{is_unique_violation, AppError};

/// Books the given time slot for the given user.
///
/// The event row is locked with `SELECT ... FOR UPDATE` for the duration of
/// the transaction, so two concurrent attempts on the same slot serialize:
/// the loser re-reads a status of BOOKED (or an existing booking row) and
/// fails cleanly. The unique index on `bookings.event_id` remains the guard
/// of last resort; a violation there means a concurrent writer won the race
/// and is reported as a booking conflict, not a storage failure.
///
/// Any early return before the commit drops the transaction and rolls back
/// both writes.
pub async fn create_booking(
    pool: &PgPool,
    event_id: i64,
    user_id: i64,
) -> Result<Booking, AppError> {
    if event_id <= 0 {
        return Err(AppError::invalid_field(
            "Valid time slot ID is required",
            "time_slot_id",
        ));
    }
    if user_id <= 0 {
        return Err(AppError::invalid_field("Valid user ID is required", "user_id"));
    }

    if !user_exists(pool, user_id).await? {
        return Err(AppError::UserNotFound { user_id });
    }

    let mut tx = pool.begin().await?;

    let status: Option<EventStatus> =
        sqlx::query_scalar("SELECT status FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?;
    let status = status.ok_or(AppError::SlotNotFound { event_id })?;

    if status == EventStatus::Booked {
        return Err(AppError::SlotAlreadyBooked { event_id });
    }

    // The cached status can lag behind the booking table, so the booking rows
    // are consulted directly: first for this user's own booking, then for
    // anyone's.
    let own_booking: Option<i64> =
        sqlx::query_scalar("SELECT id FROM bookings WHERE event_id = $1 AND created_by = $2")
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if own_booking.is_some() {
        return Err(AppError::DuplicateBooking { event_id, user_id });
    }

    let any_booking: Option<i64> =
        sqlx::query_scalar("SELECT id FROM bookings WHERE event_id = $1")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?;
    if any_booking.is_some() {
        return Err(AppError::SlotAlreadyBooked { event_id });
    }

    let booking = sqlx::query_as::<_, Booking>(
        "INSERT INTO bookings (event_id, created_by)
         VALUES ($1, $2)
         RETURNING id, created_by, event_id, booked_at, created_at",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::SlotAlreadyBooked { event_id }
        } else {
            warn!("Database error inserting booking for event {}: {}", event_id, e);
            AppError::Storage(e)
        }
    })?;

    let updated = sqlx::query("UPDATE events SET status = 'BOOKED', modified_at = now() WHERE id = $1")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    if updated.rows_affected() == 0 {
        // the event vanished between the lock and the write; nothing persists
        return Err(AppError::SlotNotFound { event_id });
    }

    tx.commit().await?;

    Ok(booking)
}

/// Cancels the caller's booking on the given event and flips the cached
/// status back to NOT_BOOKED, atomically. Cancelling a slot booked by someone
/// else is an ownership violation, reported distinctly from "no booking".
pub async fn cancel_booking(pool: &PgPool, event_id: i64, user_id: i64) -> Result<(), AppError> {
    if event_id <= 0 {
        return Err(AppError::invalid_field("Valid event ID is required", "event_id"));
    }
    if user_id <= 0 {
        return Err(AppError::invalid_field("Valid user ID is required", "user_id"));
    }

    if !user_exists(pool, user_id).await? {
        return Err(AppError::UserNotFound { user_id });
    }

    let mut tx = pool.begin().await?;

    let event: Option<i64> = sqlx::query_scalar("SELECT id FROM events WHERE id = $1 FOR UPDATE")
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;
    if event.is_none() {
        return Err(AppError::SlotNotFound { event_id });
    }

    let own_booking: Option<i64> =
        sqlx::query_scalar("SELECT id FROM bookings WHERE event_id = $1 AND created_by = $2")
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

    if own_booking.is_none() {
        let other_booking: Option<i64> =
            sqlx::query_scalar("SELECT id FROM bookings WHERE event_id = $1")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;

        return Err(match other_booking {
            Some(booking_id) => AppError::NotOwner {
                booking_id,
                user_id,
            },
            None => AppError::BookingNotFound { event_id },
        });
    }

    let deleted = sqlx::query("DELETE FROM bookings WHERE event_id = $1 AND created_by = $2")
        .bind(event_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::BookingNotFound { event_id });
    }

    let updated =
        sqlx::query("UPDATE events SET status = 'NOT_BOOKED', modified_at = now() WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
    if updated.rows_affected() == 0 {
        // rolls back the deletion too; never leave a BOOKED event with no booking
        return Err(AppError::SlotNotFound { event_id });
    }

    tx.commit().await?;

    Ok(())
}

/// All bookings held by a user, newest first, denormalized across the
/// booking, event, category and user tables.
pub async fn get_bookings_for_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<UserBookingRow>, AppError> {
    if user_id <= 0 {
        return Err(AppError::invalid_field("Valid user ID is required", "user_id"));
    }

    if !user_exists(pool, user_id).await? {
        return Err(AppError::UserNotFound { user_id });
    }

    let rows = sqlx::query_as::<_, UserBookingRow>(
        "SELECT e.status,
                u.id AS user_id,
                u.firstname,
                u.lastname,
                u.email,
                c.category_name,
                e.event_name,
                e.start_time,
                e.end_time,
                e.description,
                b.id AS booking_id,
                b.created_at AS booking_date
         FROM bookings AS b
         INNER JOIN users AS u ON b.created_by = u.id
         INNER JOIN events AS e ON b.event_id = e.id
         LEFT JOIN categories AS c ON e.category_id = c.id
         WHERE b.created_by = $1
         ORDER BY b.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        warn!("Database error fetching bookings for user {}: {}", user_id, e);
        AppError::Storage(e)
    })?;

    Ok(rows)
}
