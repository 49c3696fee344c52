use axum::Router;
use axum::routing::{get, post};

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::handler;

/// Configuration router
///
/// Reads need authentication only; proposing a change is admin-only.
pub fn router() -> Router<ServerState> {
    let reads = Router::new()
        .route("/api/settings", get(handler::settings::current))
        .route("/api/settings/history", get(handler::settings::history))
        .route("/api/settings/versions/{version}", get(handler::settings::version));

    let writes = Router::new()
        .route("/api/settings/propose", post(handler::settings::propose))
        .route_layer(axum::middleware::from_fn(require_admin));

    reads.merge(writes)
}
