pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod kinopoisk;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod routes;
pub mod search;
pub mod store;
pub mod text;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::pipeline::Resolver;

pub struct AppState {
    pub bot_token: String,
    pub resolver: Resolver,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/message", post(routes::message))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
