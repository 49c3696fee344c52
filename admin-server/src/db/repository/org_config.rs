//! Organization Configuration Repository (Versioned)
//!
//! Rows in `org_config` are append-only; each carries a version number.
//! The current configuration is the row with the highest version.
//! Serialization of concurrent writers is the store's job
//! (`settings::store`), not the repository's.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{OrgConfig, OrgSettings};
use crate::utils::time::now_millis;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Debug, Serialize)]
struct OrgConfigInsert {
    version: u64,
    author: String,
    committed_at: i64,
    settings: OrgSettings,
}

#[derive(Clone)]
pub struct OrgConfigRepository {
    base: BaseRepository,
}

impl OrgConfigRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// The current (highest-version) configuration, if any exists
    pub async fn current(&self) -> RepoResult<Option<OrgConfig>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM org_config ORDER BY version DESC LIMIT 1")
            .await?;
        let rows: Vec<OrgConfig> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// A specific retained version
    pub async fn find_version(&self, version: u64) -> RepoResult<Option<OrgConfig>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM org_config WHERE version = $version LIMIT 1")
            .bind(("version", version))
            .await?;
        let rows: Vec<OrgConfig> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Retained versions, newest first
    pub async fn history(&self, limit: usize, offset: usize) -> RepoResult<Vec<OrgConfig>> {
        let sql = format!(
            "SELECT * FROM org_config ORDER BY version DESC LIMIT {} START {}",
            limit, offset
        );
        let mut result = self.base.db().query(sql).await?;
        let rows: Vec<OrgConfig> = result.take(0)?;
        Ok(rows)
    }

    /// Append a new version row
    ///
    /// The caller must hold the commit lock and pass `version` strictly
    /// one above the current row; this method still refuses an exact
    /// duplicate as a last line of defense.
    pub async fn insert_version(
        &self,
        version: u64,
        author: String,
        settings: OrgSettings,
    ) -> RepoResult<OrgConfig> {
        if self.find_version(version).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Configuration version {} already exists",
                version
            )));
        }

        let insert = OrgConfigInsert {
            version,
            author,
            committed_at: now_millis(),
            settings,
        };

        let mut result = self
            .base
            .db()
            .query("CREATE org_config CONTENT $data RETURN AFTER")
            .bind(("data", insert))
            .await?;

        let created: Option<OrgConfig> = result.take(0)?;
        created.ok_or_else(|| {
            RepoError::Database("Failed to persist configuration version".to_string())
        })
    }
}
