//! Authentication Handlers
//!
//! Login, logout, and current-user introspection.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::audit::AuditAction;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{AccountStatus, Role};
use crate::db::repository::AccountRepository;
use crate::security_log;
use crate::utils::{AppError, AppResponse, ok};

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information returned after login
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token. Failures are
/// throttled per username using the committed security settings.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AppResponse<LoginResponse>>, AppError> {
    let security = state.config_store.get().await?.settings.security;

    if state
        .login_throttle
        .is_locked(&req.username, security.max_failed_logins)
    {
        security_log!(WARN, "login_throttled", username = %req.username);
        state
            .audit
            .log(
                AuditAction::LoginThrottled,
                "account",
                req.username.clone(),
                None,
                None,
                serde_json::json!({ "max_failed_logins": security.max_failed_logins }),
            )
            .await;
        return Err(AppError::forbidden(
            "Too many failed attempts, try again later",
        ));
    }

    let accounts = AccountRepository::new(state.get_db());
    let account = match accounts.find_live_by_username(&req.username).await? {
        Some(account) => account,
        None => {
            return Err(login_failure(&state, &req.username, "unknown_username").await);
        }
    };

    if account.status != AccountStatus::Active {
        security_log!(WARN, "login_inactive_account", username = %req.username);
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = account
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        return Err(login_failure(&state, &req.username, "invalid_password").await);
    }

    // Fetch role information
    let role: Option<Role> = state
        .get_db()
        .select(account.role.clone())
        .await
        .map_err(|e| AppError::database(format!("Failed to query role: {}", e)))?;
    let role = role.ok_or_else(|| AppError::internal("Role not found"))?;

    if !role.is_active {
        return Err(AppError::forbidden("Role has been disabled"));
    }

    let account_id = account
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    let token = state
        .get_jwt_service()
        .generate_token(
            &account_id,
            &account.username,
            &role.role_name,
            &role.permissions,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    state.login_throttle.record_success(&req.username);

    audit_log!(&account_id, "login", &req.username);
    state
        .audit
        .log(
            AuditAction::LoginSuccess,
            "account",
            account_id.clone(),
            Some(account_id.clone()),
            Some(account.username.clone()),
            serde_json::json!({}),
        )
        .await;

    tracing::info!(
        account_id = %account_id,
        username = %account.username,
        role = %role.role_name,
        "User logged in successfully"
    );

    Ok(ok(LoginResponse {
        token,
        user: UserInfo {
            id: account_id,
            username: account.username,
            full_name: account.full_name,
            role: role.role_name,
            permissions: role.permissions,
        },
    }))
}

/// Record a failed attempt and return the unified credential error
async fn login_failure(state: &ServerState, username: &str, reason: &str) -> AppError {
    let attempts = state.login_throttle.record_failure(username);
    security_log!(WARN, "auth_failed", username = %username, reason = reason, attempts = attempts);
    state
        .audit
        .log(
            AuditAction::LoginFailed,
            "account",
            username.to_string(),
            None,
            None,
            serde_json::json!({ "reason": reason, "attempts": attempts }),
        )
        .await;
    AppError::invalid_credentials()
}

/// Get current user info
pub async fn me(
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<AppResponse<UserInfo>>, AppError> {
    // full_name is not in the claims; callers wanting it hit the accounts API
    Ok(ok(UserInfo {
        id: user.id,
        username: user.username.clone(),
        full_name: user.username,
        role: user.role,
        permissions: user.permissions,
    }))
}

/// Logout handler (client-side token invalidation)
///
/// JWTs are stateless, so logout happens client-side by discarding the
/// token; this endpoint exists for the audit trail.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<AppResponse<()>>, AppError> {
    audit_log!(&user.id, "logout", &user.username);
    state
        .audit
        .log(
            AuditAction::Logout,
            "account",
            user.id.clone(),
            Some(user.id.clone()),
            Some(user.username.clone()),
            serde_json::json!({}),
        )
        .await;

    tracing::info!(
        account_id = %user.id,
        username = %user.username,
        "User logged out"
    );

    Ok(ok(()))
}
