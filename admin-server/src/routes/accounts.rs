use axum::Router;
use axum::routing::{get, post};

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::handler;

/// Account administration router - requires authentication and admin access
pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/accounts",
            get(handler::accounts::list).post(handler::accounts::create),
        )
        .route("/api/accounts/import", post(handler::accounts::bulk_import))
        .route(
            "/api/accounts/{id}",
            get(handler::accounts::get).put(handler::accounts::update),
        )
        .route(
            "/api/accounts/{id}/reset-password",
            post(handler::accounts::reset_password),
        )
        .route(
            "/api/accounts/{id}/deactivate",
            post(handler::accounts::deactivate),
        )
        .route(
            "/api/accounts/{id}/archive",
            post(handler::accounts::archive),
        )
        .route_layer(axum::middleware::from_fn(require_admin))
}
