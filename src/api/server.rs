use axum::{routing::get, Router};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::users;
use crate::config::Config;
use crate::db::repo;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}

/// Router over the shared state; split out so tests can drive it directly.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/users/", get(users::index).post(users::create))
        .route(
            "/users/{id}",
            get(users::show)
                .put(users::replace)
                .patch(users::update)
                .delete(users::remove),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: &Config) {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to SQLite");

    repo::create_user_table(&pool)
        .await
        .expect("Failed to create users table");

    let state = Arc::new(AppState { db: pool });

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app(state))
        .await
        .expect("Server failed");
}
