use std::env;

/// Startup configuration, resolved once in `main` after `dotenvy` has loaded
/// the `.env` file.
pub struct Config {
    pub database_url: String,
    pub server_address: String,
}

pub fn load() -> Config {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL is missing in env");
    let server_address = env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8000".into());

    Config {
        database_url,
        server_address,
    }
}

pub fn jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| "mysecret".into())
}

pub fn token_expiry_hours() -> u64 {
    env::var("TOKEN_EXPIRY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(1)
}
