use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use time::OffsetDateTime;

/// Full user row, including the password hash. Never serialized to a client.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
}

#[derive(Serialize, Debug, FromRow)]
pub struct UserOut {
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Deserialize)]
pub struct RegisterUser {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
