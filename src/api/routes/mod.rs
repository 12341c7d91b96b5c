//! API routes module

pub mod chat;
pub mod rooms;
pub mod ui;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

pub type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Chat routes
        .nest("/chat", chat::router())
        // Room routes
        .nest("/rooms", rooms::router())
}
