use axum::Router;
use axum::routing::get;

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::handler;

/// Role router - requires authentication and admin access
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/roles", get(handler::roles::list))
        .route_layer(axum::middleware::from_fn(require_admin))
}
