use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{error, info};

pub async fn init_db(database_url: &str) -> PgPool {
    let pool = PgPoolOptions::new()
        .max_connections(15)
        .connect(database_url)
        .await
        .expect("database not connected");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("database migrations failed");

    pool
}

/// Accounts available out of the box so the API is usable on a fresh
/// database: one admin and two regular users. Re-runs are no-ops.
const DEFAULT_USERS: [(&str, &str, &str, &str, bool); 3] = [
    ("admin@example.com", "admin123", "admin", "System Administrator", true),
    ("user@example.com", "user123", "user", "Regular User", false),
    ("test@example.com", "test123", "testuser", "Test User", false),
];

pub async fn seed_default_users(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (email, password, firstname, lastname, is_admin) in DEFAULT_USERS {
        let password_hash = match bcrypt::hash(password, 12) {
            Ok(hash) => hash,
            Err(e) => {
                error!("skipping default user {}: password hashing failed: {}", email, e);
                continue;
            }
        };

        let inserted = sqlx::query(
            "INSERT INTO users (email, firstname, lastname, password_hash, is_verified, is_admin)
             VALUES ($1, $2, $3, $4, TRUE, $5)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .bind(firstname)
        .bind(lastname)
        .bind(password_hash)
        .bind(is_admin)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            info!("seeded default user {}", email);
        }
    }

    Ok(())
}
