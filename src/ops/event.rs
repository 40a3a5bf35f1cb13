use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::warn;

use crate::models::event::{CreateEventReq, Event, EventSlot, UpdateEventReq};
use crate::ops::user::user_exists;
use crate::utils::errorhandler::AppError;

async fn category_exists(pool: &PgPool, category_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(category_id)
        .fetch_one(pool)
        .await
}

/// Persists a new event. The initial status is whatever the caller supplied;
/// it is not forced to NOT_BOOKED here.
pub async fn create_event(
    pool: &PgPool,
    payload: CreateEventReq,
    user_id: i64,
) -> Result<Event, AppError> {
    if !user_exists(pool, user_id).await? {
        return Err(AppError::invalid_field("Invalid user ID", "user_id"));
    }

    if let Some(category_id) = payload.category_id {
        if !category_exists(pool, category_id).await? {
            return Err(AppError::invalid_field("Invalid category ID", "category_id"));
        }
    }

    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO events (event_name, description, start_time, end_time, status, category_id, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, event_name, description, start_time, end_time, status,
                   category_id, created_by, created_at, modified_at",
    )
    .bind(&payload.event_name)
    .bind(&payload.description)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(payload.status)
    .bind(payload.category_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        warn!("Database error inserting event: {}", e);
        AppError::Storage(e)
    })?;

    Ok(event)
}

pub async fn get_event_by_id(pool: &PgPool, event_id: i64) -> Result<Event, AppError> {
    if event_id <= 0 {
        return Err(AppError::invalid_field("Event ID must be positive", "event_id"));
    }

    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::SlotNotFound { event_id })
}

/// Every event with its booker's id (only while booked) and category name
/// (only when linked).
pub async fn list_events(pool: &PgPool) -> Result<Vec<EventSlot>, AppError> {
    let events = sqlx::query_as::<_, EventSlot>(
        "SELECT e.status,
                CASE WHEN e.status = 'BOOKED' THEN b.created_by END AS user_id,
                e.id,
                c.category_name,
                e.event_name,
                e.start_time,
                e.end_time,
                e.description
         FROM events AS e
         LEFT JOIN bookings AS b ON b.event_id = e.id
         LEFT JOIN categories AS c ON e.category_id = c.id
         ORDER BY e.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(events)
}

/// Applies only the supplied fields; the cached status is deliberately not
/// updatable here, only the booking operations move it.
pub async fn update_event(pool: &PgPool, payload: UpdateEventReq) -> Result<i64, AppError> {
    if payload.id <= 0 {
        return Err(AppError::invalid_field("Valid event ID is required", "id"));
    }

    if let Some(category_id) = payload.category_id {
        if !category_exists(pool, category_id).await? {
            return Err(AppError::invalid_field("Invalid category ID", "category_id"));
        }
    }

    if payload.event_name.is_none()
        && payload.description.is_none()
        && payload.start_time.is_none()
        && payload.end_time.is_none()
        && payload.category_id.is_none()
    {
        return Err(AppError::invalid_argument("No fields to update provided"));
    }

    let mut qb = QueryBuilder::<Postgres>::new("UPDATE events SET ");
    let mut fields = qb.separated(", ");
    if let Some(event_name) = &payload.event_name {
        fields.push("event_name = ").push_bind_unseparated(event_name);
    }
    if let Some(description) = &payload.description {
        fields.push("description = ").push_bind_unseparated(description);
    }
    if let Some(start_time) = payload.start_time {
        fields.push("start_time = ").push_bind_unseparated(start_time);
    }
    if let Some(end_time) = payload.end_time {
        fields.push("end_time = ").push_bind_unseparated(end_time);
    }
    if let Some(category_id) = payload.category_id {
        fields.push("category_id = ").push_bind_unseparated(category_id);
    }
    fields.push("modified_at = now()");
    qb.push(" WHERE id = ").push_bind(payload.id);

    let result = qb.build().execute(pool).await.map_err(|e| {
        warn!("Database error updating event {}: {}", payload.id, e);
        AppError::Storage(e)
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::SlotNotFound {
            event_id: payload.id,
        });
    }

    Ok(payload.id)
}

/// Deletion is blocked while any booking still references the event.
pub async fn delete_event(pool: &PgPool, event_id: i64) -> Result<(), AppError> {
    if event_id <= 0 {
        return Err(AppError::invalid_field("Event ID must be positive", "event_id"));
    }

    let booking_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(pool)
            .await?;
    if booking_count > 0 {
        return Err(AppError::EventHasBookings {
            event_id,
            booking_count,
        });
    }

    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(event_id)
        .execute(pool)
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => Err(AppError::SlotNotFound { event_id }),
        Ok(_) => Ok(()),
        // a booking arrived between the count and the delete
        Err(e) if crate::utils::errorhandler::is_foreign_key_violation(&e) => {
            let booking_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
                    .bind(event_id)
                    .fetch_one(pool)
                    .await?;
            Err(AppError::EventHasBookings {
                event_id,
                booking_count,
            })
        }
        Err(e) => {
            warn!("Database error deleting event {}: {}", event_id, e);
            Err(AppError::Storage(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventStatus;
    use crate::ops::booking::create_booking;
    use crate::ops::testsupport::{seed_category, seed_user};
    use time::{Duration, OffsetDateTime};

    fn req(name: &str, category_id: Option<i64>, status: EventStatus) -> CreateEventReq {
        let start = OffsetDateTime::now_utc();
        CreateEventReq {
            event_name: name.into(),
            description: "an evening slot".into(),
            start_time: start,
            end_time: start + Duration::hours(2),
            status,
            category_id,
        }
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres running
    async fn caller_supplied_status_is_kept(pool: PgPool) {
        let admin = seed_user(&pool, "admin@example.com").await;

        let event = create_event(&pool, req("Open slot", None, EventStatus::NotBooked), admin)
            .await
            .unwrap();
        assert_eq!(event.status, EventStatus::NotBooked);

        // creation does not force NOT_BOOKED
        let event = create_event(&pool, req("Pre-booked", None, EventStatus::Booked), admin)
            .await
            .unwrap();
        assert_eq!(event.status, EventStatus::Booked);
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres running
    async fn creation_validates_references(pool: PgPool) {
        let admin = seed_user(&pool, "admin@example.com").await;

        let err = create_event(&pool, req("Slot", None, EventStatus::NotBooked), 9999)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { .. }));

        let err = create_event(&pool, req("Slot", Some(9999), EventStatus::NotBooked), admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { .. }));

        let music = seed_category(&pool, "Music", admin).await;
        let event = create_event(&pool, req("Slot", Some(music), EventStatus::NotBooked), admin)
            .await
            .unwrap();
        assert_eq!(event.category_id, Some(music));
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres running
    async fn partial_update_touches_only_supplied_fields(pool: PgPool) {
        let admin = seed_user(&pool, "admin@example.com").await;
        let event = create_event(&pool, req("Slot", None, EventStatus::NotBooked), admin)
            .await
            .unwrap();

        update_event(
            &pool,
            UpdateEventReq {
                id: event.id,
                event_name: Some("Renamed slot".into()),
                description: None,
                start_time: None,
                end_time: None,
                category_id: None,
            },
        )
        .await
        .unwrap();

        let updated = get_event_by_id(&pool, event.id).await.unwrap();
        assert_eq!(updated.event_name, "Renamed slot");
        assert_eq!(updated.description, event.description);
        assert!(updated.modified_at >= event.modified_at);

        let err = update_event(
            &pool,
            UpdateEventReq {
                id: event.id,
                event_name: None,
                description: None,
                start_time: None,
                end_time: None,
                category_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { .. }));

        let err = update_event(
            &pool,
            UpdateEventReq {
                id: 9999,
                event_name: Some("Ghost".into()),
                description: None,
                start_time: None,
                end_time: None,
                category_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::SlotNotFound { .. }));
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres running
    async fn deletion_is_blocked_while_booked(pool: PgPool) {
        let admin = seed_user(&pool, "admin@example.com").await;
        let alice = seed_user(&pool, "alice@example.com").await;
        let event = create_event(&pool, req("Slot", None, EventStatus::NotBooked), admin)
            .await
            .unwrap();

        create_booking(&pool, event.id, alice).await.unwrap();

        let err = delete_event(&pool, event.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::EventHasBookings {
                booking_count: 1,
                ..
            }
        ));

        crate::ops::booking::cancel_booking(&pool, event.id, alice)
            .await
            .unwrap();
        delete_event(&pool, event.id).await.unwrap();

        let err = delete_event(&pool, event.id).await.unwrap_err();
        assert!(matches!(err, AppError::SlotNotFound { .. }));
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres running
    async fn listing_surfaces_booker_only_while_booked(pool: PgPool) {
        let admin = seed_user(&pool, "admin@example.com").await;
        let alice = seed_user(&pool, "alice@example.com").await;
        let music = seed_category(&pool, "Music", admin).await;
        let open = create_event(&pool, req("Open", Some(music), EventStatus::NotBooked), admin)
            .await
            .unwrap();
        let taken = create_event(&pool, req("Taken", None, EventStatus::NotBooked), admin)
            .await
            .unwrap();

        create_booking(&pool, taken.id, alice).await.unwrap();

        let slots = list_events(&pool).await.unwrap();
        assert_eq!(slots.len(), 2);

        let open_row = slots.iter().find(|s| s.id == open.id).unwrap();
        assert_eq!(open_row.user_id, None);
        assert_eq!(open_row.category_name.as_deref(), Some("Music"));
        assert_eq!(open_row.status, EventStatus::NotBooked);

        let taken_row = slots.iter().find(|s| s.id == taken.id).unwrap();
        assert_eq!(taken_row.user_id, Some(alice));
        assert_eq!(taken_row.category_name, None);
        assert_eq!(taken_row.status, EventStatus::Booked);
    }
}
