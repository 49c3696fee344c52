//! Audit Trail Types
//!
//! Core data structures of the tamper-evident audit trail. Entries are
//! immutable, never deleted, and chained with SHA-256 hashes.

use serde::{Deserialize, Serialize};

/// Audit action types (enumerated, not free text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ System lifecycle ═══
    SystemStartup,
    SystemShutdown,

    // ═══ Authentication ═══
    LoginSuccess,
    LoginFailed,
    LoginThrottled,
    Logout,

    // ═══ Account administration ═══
    AccountCreated,
    AccountUpdated,
    AccountPasswordReset,
    AccountDeactivated,
    AccountArchived,
    AccountBulkImport,

    // ═══ Configuration ═══
    ConfigCommitted,
    ConfigRejected,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One immutable audit entry
///
/// - `prev_hash`: hash of the previous entry
/// - `curr_hash`: hash over prev_hash + all fields of this entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Globally increasing sequence number
    pub id: u64,
    /// Unix millis
    pub timestamp: i64,
    pub action: AuditAction,
    /// Resource kind ("account", "org_config", "system")
    pub resource_type: String,
    /// Resource id ("account:xyz", "org_config:v12", "server:main")
    pub resource_id: String,
    /// Operator id (None for system events)
    pub operator_id: Option<String>,
    pub operator_name: Option<String>,
    /// Structured details (JSON)
    pub details: serde_json::Value,
    pub prev_hash: String,
    pub curr_hash: String,
}

/// Audit query parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditQuery {
    /// Inclusive window start (Unix millis)
    pub from: Option<i64>,
    /// Inclusive window end (Unix millis)
    pub to: Option<i64>,
    pub action: Option<AuditAction>,
    pub operator_id: Option<String>,
    pub resource_type: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            action: None,
            operator_id: None,
            resource_type: None,
            offset: 0,
            limit: 50,
        }
    }
}

/// Audit list response
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: u64,
}

/// Result of an audit chain verification
#[derive(Debug, Serialize)]
pub struct AuditChainVerification {
    pub total_entries: u64,
    pub chain_intact: bool,
    pub breaks: Vec<AuditChainBreak>,
}

/// A break point found during chain verification
#[derive(Debug, Serialize)]
pub struct AuditChainBreak {
    /// Sequence number at the break
    pub entry_id: u64,
    pub expected_hash: String,
    pub actual_hash: String,
}
