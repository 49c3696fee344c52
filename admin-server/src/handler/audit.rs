//! Audit Trail Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::audit::{AuditChainVerification, AuditListResponse, AuditQuery};
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, ok};

/// Query the audit trail
pub async fn query(
    State(state): State<ServerState>,
    Query(q): Query<AuditQuery>,
) -> Result<Json<AppResponse<AuditListResponse>>, AppError> {
    let (items, total) = state.audit.query(&q).await?;
    Ok(ok(AuditListResponse { items, total }))
}

/// Verify the hash chain end to end
pub async fn verify(
    State(state): State<ServerState>,
) -> Result<Json<AppResponse<AuditChainVerification>>, AppError> {
    let verification = state.audit.verify_chain().await?;
    Ok(ok(verification))
}
