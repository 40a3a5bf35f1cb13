use axum::http::StatusCode;
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub sub: String,
    pub is_admin: bool,
    pub exp: usize,
}

pub fn issue_token(
    user_id: i64,
    email: &str,
    is_admin: bool,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        + expiry_hours * 3600) as usize;

    let claims = Claims {
        id: user_id,
        sub: email.to_owned(),
        is_admin,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

pub async fn verify_auth_token(
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Claims, StatusCode> {
    decode_token(auth.token(), &config::jwt_secret()).map_err(|_| StatusCode::UNAUTHORIZED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_claims() {
        let token = issue_token(42, "user@example.com", true, "testsecret", 1).unwrap();
        let claims = decode_token(&token, "testsecret").unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.sub, "user@example.com");
        assert!(claims.is_admin);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(42, "user@example.com", false, "testsecret", 1).unwrap();
        assert!(decode_token(&token, "othersecret").is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(42, "user@example.com", false, "testsecret", 1).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(decode_token(&tampered, "testsecret").is_err());
    }
}
