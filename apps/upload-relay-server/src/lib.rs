//! Upload Relay Server Library
//!
//! The server binary is in main.rs; the router is built here so tests can
//! drive it without a socket.
//!
//! # Modules
//!
//! - `upload`: streaming pipeline (relay, producer, consumer, size guard, digest)
//! - `routes`: HTTP handlers and middleware
//! - `config`: environment-driven configuration

pub mod config;
pub mod routes;
pub mod state;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let assets = ServeDir::new(&state.config().assets.dir);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/upload",
            post(routes::upload::upload_file).layer(DefaultBodyLimit::disable()),
        )
        .fallback_service(assets)
        .layer(middleware::from_fn(routes::timing::stamp_start))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
