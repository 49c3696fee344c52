//! Database Module
//!
//! Embedded SurrealDB: RocksDB-backed on disk in production, in-memory
//! for tests. Tables are schemaless; the indexes that matter are defined
//! at startup.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.select_namespace().await?;
        service.define_schema().await?;

        tracing::info!(path = db_path, "Database opened (embedded RocksDB)");
        Ok(service)
    }

    /// Open a throwaway in-memory database (tests)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        let service = Self { db };
        service.select_namespace().await?;
        service.define_schema().await?;
        Ok(service)
    }

    async fn select_namespace(&self) -> Result<(), AppError> {
        self.db
            .use_ns("attendance")
            .use_db("admin")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))
    }

    /// Define lookup indexes
    ///
    /// Username uniqueness is NOT a database constraint: it holds only
    /// among non-archived accounts, so the repository enforces it.
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                "DEFINE INDEX IF NOT EXISTS account_username ON TABLE account FIELDS username;
                 DEFINE INDEX IF NOT EXISTS role_name ON TABLE role FIELDS role_name;
                 DEFINE INDEX IF NOT EXISTS org_config_version ON TABLE org_config FIELDS version;
                 DEFINE INDEX IF NOT EXISTS audit_sequence ON TABLE audit_log FIELDS sequence;",
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
