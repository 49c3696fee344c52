//! Audit Trail Service
//!
//! Facade over the hash-chained storage:
//! - async writes through an mpsc channel (never dropped: sends block
//!   when the channel is full)
//! - direct synchronous writes for startup/shutdown
//! - queries and chain verification read storage directly

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use super::storage::{AuditStorage, AuditStorageError};
use super::types::{AuditAction, AuditChainVerification, AuditEntry, AuditQuery};

/// One log request sent to the worker
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<String>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
}

/// Audit trail service
pub struct AuditService {
    storage: AuditStorage,
    tx: mpsc::Sender<AuditLogRequest>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// Create the service and its worker inbox
    ///
    /// The caller hands the receiver to an [`super::AuditWorker`].
    pub fn new(db: Surreal<Db>, buffer_size: usize) -> (Arc<Self>, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let storage = AuditStorage::new(db);
        let service = Arc::new(Self { storage, tx });
        (service, rx)
    }

    /// Record an entry asynchronously (non-blocking for the caller path)
    pub async fn log(
        &self,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        operator_id: Option<String>,
        operator_name: Option<String>,
        details: serde_json::Value,
    ) {
        let req = AuditLogRequest {
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            operator_id,
            operator_name,
            details,
        };

        // Blocking send — audit entries must not be dropped
        if self.tx.send(req).await.is_err() {
            tracing::error!("Audit channel closed — audit entry lost!");
        }
    }

    /// Write an entry directly (startup/shutdown paths)
    pub async fn log_sync(
        &self,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        details: serde_json::Value,
    ) -> Result<AuditEntry, AuditStorageError> {
        self.storage
            .append(
                action,
                resource_type.into(),
                resource_id.into(),
                None,
                None,
                details,
            )
            .await
    }

    /// Query the trail
    pub async fn query(
        &self,
        q: &AuditQuery,
    ) -> Result<(Vec<AuditEntry>, u64), AuditStorageError> {
        self.storage.query(q).await
    }

    /// Verify chain integrity
    pub async fn verify_chain(&self) -> Result<AuditChainVerification, AuditStorageError> {
        self.storage.verify_chain().await
    }

    /// Storage handle (worker construction)
    pub fn storage(&self) -> &AuditStorage {
        &self.storage
    }
}
