pub mod booking;
pub mod category;
pub mod event;
pub mod user;

#[cfg(test)]
pub(crate) mod testsupport {
    use sqlx::PgPool;

    use crate::models::event::EventStatus;

    pub async fn seed_user(pool: &PgPool, email: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO users (email, firstname, lastname, password_hash)
             VALUES ($1, 'Test', 'User', 'not-a-real-hash')
             RETURNING id",
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    pub async fn seed_category(pool: &PgPool, name: &str, created_by: i64) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO categories (category_name, color, created_by)
             VALUES ($1, '#ff0000', $2)
             RETURNING id",
        )
        .bind(name)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    /// Event with its own creator, NOT_BOOKED, spanning the next hour.
    pub async fn seed_event(pool: &PgPool, name: &str, category_id: Option<i64>) -> i64 {
        let owner_email = format!(
            "owner-{}@example.com",
            name.to_lowercase().replace(' ', "-")
        );
        let owner = seed_user(pool, &owner_email).await;
        sqlx::query_scalar(
            "INSERT INTO events (event_name, description, start_time, end_time, category_id, created_by)
             VALUES ($1, 'seeded', now(), now() + interval '1 hour', $2, $3)
             RETURNING id",
        )
        .bind(name)
        .bind(category_id)
        .bind(owner)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    pub async fn seed_event_in_category(
        pool: &PgPool,
        name: &str,
        category_id: i64,
        created_by: i64,
    ) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO events (event_name, description, start_time, end_time, category_id, created_by)
             VALUES ($1, 'seeded', now(), now() + interval '1 hour', $2, $3)
             RETURNING id",
        )
        .bind(name)
        .bind(category_id)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    pub async fn event_status(pool: &PgPool, event_id: i64) -> EventStatus {
        sqlx::query_scalar("SELECT status FROM events WHERE id = $1")
            .bind(event_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }
}
