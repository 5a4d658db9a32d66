//! API layer - HTTP and WebSocket entry points.

pub mod connections;
pub mod http;
pub mod websocket;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::app::App;

pub use connections::ConnectionManager;

/// All routes, bound to the application state. Middleware is added by the
/// caller.
pub fn router(app: Arc<App>) -> Router {
    http::routes()
        .route("/ws", get(websocket::ws_handler))
        .with_state(app)
}
