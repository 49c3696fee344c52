//! Configuration Handlers
//!
//! Read and propose changes to the versioned organization configuration.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::audit::AuditAction;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OrgConfig, OrgSettingsPatch};
use crate::settings::ProposeError;
use crate::utils::{AppError, AppResponse, ok};

/// Propose request payload
#[derive(Debug, Deserialize)]
pub struct ProposeRequest {
    /// The version the patch was computed against
    pub base_version: u64,
    pub patch: OrgSettingsPatch,
}

/// History query options
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// Current configuration
pub async fn current(
    State(state): State<ServerState>,
) -> Result<Json<AppResponse<OrgConfig>>, AppError> {
    let config = state.config_store.get().await?;
    Ok(ok(config))
}

/// Propose a configuration patch
///
/// Commits a new version on success; a stale base version or a failed
/// validation leaves the stored configuration untouched.
pub async fn propose(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ProposeRequest>,
) -> Result<Json<AppResponse<OrgConfig>>, AppError> {
    if req.patch.is_empty() {
        return Err(AppError::validation("Patch changes nothing"));
    }

    match state
        .config_store
        .propose(req.base_version, &req.patch, &user.username)
        .await
    {
        Ok(committed) => {
            audit_log!(&user.id, "config_commit", &format!("org_config:v{}", committed.version));
            state
                .audit
                .log(
                    AuditAction::ConfigCommitted,
                    "org_config",
                    format!("org_config:v{}", committed.version),
                    Some(user.id.clone()),
                    Some(user.username.clone()),
                    serde_json::json!({
                        "version": committed.version,
                        "base_version": req.base_version,
                    }),
                )
                .await;
            Ok(ok(committed))
        }
        Err(ProposeError::StaleVersion { base, latest }) => Err(AppError::StaleVersion(format!(
            "Base version {} is stale, latest is {}; re-fetch and retry",
            base, latest
        ))),
        Err(ProposeError::Rejected(violations)) => {
            state
                .audit
                .log(
                    AuditAction::ConfigRejected,
                    "org_config",
                    format!("org_config:v{}", req.base_version),
                    Some(user.id.clone()),
                    Some(user.username.clone()),
                    serde_json::json!({
                        "violations": violations.len(),
                    }),
                )
                .await;
            Err(AppError::ConfigRejected(violations))
        }
        Err(ProposeError::Repo(e)) => Err(e.into()),
    }
}

/// Retained versions, newest first
pub async fn history(
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<AppResponse<Vec<OrgConfig>>>, AppError> {
    let versions = state
        .config_store
        .history(query.limit, query.offset)
        .await?;
    Ok(ok(versions))
}

/// One retained version
pub async fn version(
    State(state): State<ServerState>,
    Path(version): Path<u64>,
) -> Result<Json<AppResponse<OrgConfig>>, AppError> {
    let config = state
        .config_store
        .version(version)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Configuration version {}", version)))?;
    Ok(ok(config))
}
