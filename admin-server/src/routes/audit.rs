use axum::Router;
use axum::routing::get;

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::handler;

/// Audit router - requires authentication and admin access
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/audit", get(handler::audit::query))
        .route("/api/audit/verify", get(handler::audit::verify))
        .route_layer(axum::middleware::from_fn(require_admin))
}
