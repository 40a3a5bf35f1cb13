use bcrypt::{hash, verify};
use sqlx::PgPool;
use tracing::warn;

use crate::config;
use crate::models::user::{LoginRequest, RegisterUser, User, UserOut};
use crate::utils::errorhandler::{is_unique_violation, AppError};
use crate::utils::jwt::issue_token;

const USER_COLUMNS: &str = "id, email, firstname, lastname, is_verified, is_admin, created_at";

pub(crate) async fn user_exists<'e, E>(executor: E, user_id: i64) -> Result<bool, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

pub async fn register_user(pool: &PgPool, payload: RegisterUser) -> Result<UserOut, AppError> {
    if payload.email.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::invalid_argument("Email and password are required"));
    }

    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&payload.email)
        .fetch_one(pool)
        .await?;
    if taken {
        return Err(AppError::EmailAlreadyExists {
            email: payload.email,
        });
    }

    let password_hash = hash(&payload.password, 12).map_err(|e| {
        warn!("Password hashing failed: {}", e);
        AppError::invalid_argument("invalid password")
    })?;

    let user = sqlx::query_as::<_, UserOut>(&format!(
        "INSERT INTO users (email, firstname, lastname, password_hash)
         VALUES ($1, $2, $3, $4)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&payload.email)
    .bind(&payload.firstname)
    .bind(&payload.lastname)
    .bind(&password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::EmailAlreadyExists {
                email: payload.email.clone(),
            }
        } else {
            warn!("Database error inserting user: {}", e);
            AppError::Storage(e)
        }
    })?;

    Ok(user)
}

pub async fn login_user(pool: &PgPool, payload: LoginRequest) -> Result<String, AppError> {
    if payload.email.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::invalid_argument("Email and password are required"));
    }
    if !payload.email.contains('@') {
        return Err(AppError::invalid_field("Invalid email format", "email"));
    }

    let user = get_user_by_email(pool, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!("Failed login attempt: no user for email {}", payload.email);
            AppError::unauthorized("Invalid email or password")
        })?;

    let valid = verify(&payload.password, &user.password_hash)
        .map_err(|_| AppError::unauthorized("Invalid email or password"))?;
    if !valid {
        warn!("Failed login attempt: invalid password for email {}", payload.email);
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    issue_token(
        user.id,
        &user.email,
        user.is_admin,
        &config::jwt_secret(),
        config::token_expiry_hours(),
    )
    .map_err(|e| {
        warn!("JWT encoding failed: {}", e);
        AppError::Unexpected
    })
}

pub async fn get_users(pool: &PgPool) -> Result<Vec<UserOut>, AppError> {
    let users = sqlx::query_as::<_, UserOut>(&format!("SELECT {USER_COLUMNS} FROM users"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn get_user(pool: &PgPool, user_id: i64) -> Result<UserOut, AppError> {
    if user_id <= 0 {
        return Err(AppError::invalid_field("Valid user ID is required", "user_id"));
    }

    sqlx::query_as::<_, UserOut>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::UserNotFound { user_id })
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    #[ignore] // Requires Postgres running
    async fn register_then_login(pool: PgPool) {
        let user = register_user(
            &pool,
            RegisterUser {
                email: "alice@example.com".into(),
                firstname: "Alice".into(),
                lastname: "Smith".into(),
                password: "hunter22".into(),
            },
        )
        .await
        .unwrap();
        assert!(!user.is_admin);
        assert!(!user.is_verified);

        let token = login_user(
            &pool,
            LoginRequest {
                email: "alice@example.com".into(),
                password: "hunter22".into(),
            },
        )
        .await
        .unwrap();
        assert!(!token.is_empty());

        let err = login_user(
            &pool,
            LoginRequest {
                email: "alice@example.com".into(),
                password: "wrong".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres running
    async fn duplicate_email_is_rejected(pool: PgPool) {
        let req = || RegisterUser {
            email: "bob@example.com".into(),
            firstname: "Bob".into(),
            lastname: "Jones".into(),
            password: "hunter22".into(),
        };
        register_user(&pool, req()).await.unwrap();
        let err = register_user(&pool, req()).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists { .. }));
    }

    #[sqlx::test]
    #[ignore] // Requires Postgres running
    async fn missing_user_lookup_fails(pool: PgPool) {
        let err = get_user(&pool, 9999).await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound { user_id: 9999 }));

        let err = get_user(&pool, 0).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { .. }));
    }
}
