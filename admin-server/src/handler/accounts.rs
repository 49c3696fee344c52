//! Account Administration Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::accounts::{ImportReport, ImportRow};
use crate::audit::AuditAction;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Account, AccountCreate, AccountUpdate, TemporaryCredential};
use crate::utils::{AppError, AppResponse, ok};

/// List query options
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Include deactivated and archived records
    #[serde(default)]
    pub include_inactive: bool,
}

/// List accounts
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AppResponse<Vec<Account>>>, AppError> {
    let accounts = state.account_admin.list(query.include_inactive).await?;
    Ok(ok(accounts))
}

/// Fetch one account
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<Account>>, AppError> {
    let account = state.account_admin.get(&id).await?;
    Ok(ok(account))
}

/// Create an account
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AccountCreate>,
) -> Result<Json<AppResponse<Account>>, AppError> {
    let account = state.account_admin.create(payload).await?;
    let account_id = record_id(&account);

    audit_log!(&user.id, "account_create", &account_id);
    state
        .audit
        .log(
            AuditAction::AccountCreated,
            "account",
            account_id,
            Some(user.id.clone()),
            Some(user.username.clone()),
            serde_json::json!({ "username": account.username }),
        )
        .await;

    Ok(ok(account))
}

/// Edit an account
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<AppResponse<Account>>, AppError> {
    let account = state.account_admin.edit(&id, payload).await?;

    audit_log!(&user.id, "account_update", &id);
    state
        .audit
        .log(
            AuditAction::AccountUpdated,
            "account",
            id,
            Some(user.id.clone()),
            Some(user.username.clone()),
            serde_json::json!({ "username": account.username }),
        )
        .await;

    Ok(ok(account))
}

/// Issue a temporary password
pub async fn reset_password(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<TemporaryCredential>>, AppError> {
    let credential = state.account_admin.reset_password(&id).await?;

    audit_log!(&user.id, "account_reset_password", &id);
    state
        .audit
        .log(
            AuditAction::AccountPasswordReset,
            "account",
            id,
            Some(user.id.clone()),
            Some(user.username.clone()),
            serde_json::json!({ "username": credential.username }),
        )
        .await;

    Ok(ok(credential))
}

/// Deactivate an account (idempotent)
pub async fn deactivate(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<Account>>, AppError> {
    let account = state.account_admin.deactivate(&id).await?;

    audit_log!(&user.id, "account_deactivate", &id);
    state
        .audit
        .log(
            AuditAction::AccountDeactivated,
            "account",
            id,
            Some(user.id.clone()),
            Some(user.username.clone()),
            serde_json::json!({ "username": account.username }),
        )
        .await;

    Ok(ok(account))
}

/// Archive an account (terminal)
pub async fn archive(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<Account>>, AppError> {
    let account = state.account_admin.archive(&id).await?;

    audit_log!(&user.id, "account_archive", &id);
    state
        .audit
        .log(
            AuditAction::AccountArchived,
            "account",
            id,
            Some(user.id.clone()),
            Some(user.username.clone()),
            serde_json::json!({ "username": account.username }),
        )
        .await;

    Ok(ok(account))
}

/// Bulk import accounts from tabular rows
pub async fn bulk_import(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(rows): Json<Vec<ImportRow>>,
) -> Result<Json<AppResponse<ImportReport>>, AppError> {
    let outcomes = state.account_admin.bulk_import(rows).await?;
    let report = ImportReport::from_rows(outcomes);

    audit_log!(&user.id, "account_bulk_import", "account:batch");
    state
        .audit
        .log(
            AuditAction::AccountBulkImport,
            "account",
            "account:batch".to_string(),
            Some(user.id.clone()),
            Some(user.username.clone()),
            serde_json::json!({
                "total": report.total,
                "created": report.created,
                "failed": report.failed,
            }),
        )
        .await;

    Ok(ok(report))
}

fn record_id(account: &Account) -> String {
    account
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}
