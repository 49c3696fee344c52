//! Configuration Store
//!
//! Owns the versioned settings document. Proposals are serialized behind
//! an async lock and validated against the latest committed version, so
//! no reader ever observes a partially-applied patch and no commit is
//! lost to a concurrent writer.

use std::sync::Arc;

use parking_lot::RwLock;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

use super::validator::{self, Violation};
use crate::db::models::{OrgConfig, OrgSettings, OrgSettingsPatch};
use crate::db::repository::{OrgConfigRepository, RepoError};

/// Why a proposal was not committed
#[derive(Debug, thiserror::Error)]
pub enum ProposeError {
    /// The proposal was based on a superseded version; re-fetch and retry
    #[error("Base version {base} is stale, latest is {latest}")]
    StaleVersion { base: u64, latest: u64 },

    /// The candidate broke one or more constraints; store unchanged
    #[error("Configuration rejected with {} violation(s)", .0.len())]
    Rejected(Vec<Violation>),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Versioned configuration store
///
/// Cloning is cheap; clones share the commit lock and the read cache.
#[derive(Clone)]
pub struct ConfigStore {
    repo: OrgConfigRepository,
    /// Serializes propose() end to end (read latest → validate → insert)
    commit_lock: Arc<Mutex<()>>,
    /// Last committed version, for read-your-writes without a query
    current: Arc<RwLock<Option<OrgConfig>>>,
}

impl ConfigStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: OrgConfigRepository::new(db),
            commit_lock: Arc::new(Mutex::new(())),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// The current active configuration
    ///
    /// Bootstraps version 1 from defaults when the organization has no
    /// configuration yet.
    pub async fn get(&self) -> Result<OrgConfig, RepoError> {
        if let Some(config) = self.current.read().clone() {
            return Ok(config);
        }

        let _guard = self.commit_lock.lock().await;

        // Re-check under the lock; another caller may have bootstrapped
        if let Some(config) = self.current.read().clone() {
            return Ok(config);
        }

        let config = match self.repo.current().await? {
            Some(config) => config,
            None => {
                tracing::info!("No configuration found, committing defaults as version 1");
                self.repo
                    .insert_version(1, "system".to_string(), OrgSettings::default())
                    .await?
            }
        };

        *self.current.write() = Some(config.clone());
        Ok(config)
    }

    /// Validate and commit a proposed patch
    ///
    /// On success the new version (exactly `base_version + 1`) is
    /// persisted and returned. On any failure the store is unchanged.
    pub async fn propose(
        &self,
        base_version: u64,
        patch: &OrgSettingsPatch,
        author: &str,
    ) -> Result<OrgConfig, ProposeError> {
        let _guard = self.commit_lock.lock().await;

        let latest = match self.repo.current().await? {
            Some(config) => config,
            None => {
                self.repo
                    .insert_version(1, "system".to_string(), OrgSettings::default())
                    .await?
            }
        };

        if latest.version != base_version {
            return Err(ProposeError::StaleVersion {
                base: base_version,
                latest: latest.version,
            });
        }

        let candidate = patch.apply(&latest.settings);

        let violations = validator::validate(&candidate);
        if !violations.is_empty() {
            return Err(ProposeError::Rejected(violations));
        }

        let committed = self
            .repo
            .insert_version(latest.version + 1, author.to_string(), candidate)
            .await?;

        *self.current.write() = Some(committed.clone());

        tracing::info!(
            version = committed.version,
            author = %committed.author,
            "Configuration version committed"
        );

        Ok(committed)
    }

    /// Retained versions, newest first
    pub async fn history(&self, limit: usize, offset: usize) -> Result<Vec<OrgConfig>, RepoError> {
        self.repo.history(limit, offset).await
    }

    /// A specific retained version
    pub async fn version(&self, version: u64) -> Result<Option<OrgConfig>, RepoError> {
        self.repo.find_version(version).await
    }
}
