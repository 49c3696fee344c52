//! Role Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::RoleRepository;
use crate::utils::{AppError, AppResponse, ok};

/// List active roles
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<AppResponse<Vec<Role>>>, AppError> {
    let roles = RoleRepository::new(state.get_db()).find_all().await?;
    Ok(ok(roles))
}
