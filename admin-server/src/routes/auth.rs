use axum::Router;
use axum::routing::{get, post};

use crate::core::ServerState;
use crate::handler;

/// Auth router - login is public, the rest requires authentication
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::auth::login))
        .route("/api/auth/logout", post(handler::auth::logout))
        .route("/api/auth/me", get(handler::auth::me))
}
