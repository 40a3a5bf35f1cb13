mod config;
mod db;
mod models;
mod ops;
mod route;
mod routemount;
mod utils;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::db::{init_db, seed_default_users};
use crate::routemount::route::create_router;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = config::load();

    //connect to db
    let db_pool = init_db(&cfg.database_url).await;
    seed_default_users(&db_pool)
        .await
        .expect("failed to seed default users");

    let app = create_router(db_pool);

    let listener = tokio::net::TcpListener::bind(&cfg.server_address)
        .await
        .expect("failed to bind server address");
    info!("server running on {}", cfg.server_address);
    axum::serve(listener, app).await.expect("server error");
}
