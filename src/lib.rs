pub mod config;
pub mod db;
pub mod entities;
pub mod envelope;
pub mod error;
pub mod models;
pub mod routes;
pub mod seed;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::store::MovieStore;

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieStore,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movies", post(routes::create).get(routes::list))
        .route("/movie/{id}", get(routes::get).put(routes::update).delete(routes::remove))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
}

/// Installs the fmt subscriber used by every binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movie_catalog=debug,sqlx=warn".to_string()),
        )
        .init();
}
