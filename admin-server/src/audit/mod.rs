//! Audit Trail Module — tamper-evident administrative audit log
//!
//! # Architecture
//!
//! ```text
//! sensitive operation
//!   ├─ AuditService::log() → mpsc → AuditWorker → audit_log table
//!   └─ AuditService::log_sync() → audit_log table (startup/shutdown)
//!
//! SHA-256 hash chain: genesis → entry₁ → entry₂ → ... → entryₙ
//! ```
//!
//! # Tamper evidence
//!
//! - every entry carries the previous entry's hash
//! - append-only: no update or delete paths
//! - the chain can be re-verified at any time via the API

pub mod service;
pub mod storage;
pub mod types;
pub mod worker;

pub use service::{AuditLogRequest, AuditService};
pub use storage::{AuditStorage, AuditStorageError};
pub use types::{
    AuditAction, AuditChainVerification, AuditEntry, AuditListResponse, AuditQuery,
};
pub use worker::AuditWorker;
