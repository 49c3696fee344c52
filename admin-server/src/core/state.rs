//! Server State
//!
//! `ServerState` holds shared references to every service; `Arc` fields
//! make cloning cheap, so handlers receive it by value.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::accounts::AccountAdmin;
use crate::audit::{AuditService, AuditWorker};
use crate::auth::{JwtService, LoginThrottle};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{AccountRepository, RoleRepository};
use crate::settings::ConfigStore;

/// Shared server state
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | Process configuration (immutable) |
/// | db | Embedded database handle |
/// | jwt_service | Token issuing/validation |
/// | config_store | Versioned organization configuration |
/// | account_admin | Account lifecycle operations |
/// | audit | Tamper-evident audit trail |
/// | login_throttle | Failed-login counters |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub config_store: ConfigStore,
    pub account_admin: AccountAdmin,
    pub audit: Arc<AuditService>,
    pub login_throttle: Arc<LoginThrottle>,
}

impl ServerState {
    /// Initialize all services against the on-disk database
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened; the process is useless
    /// without it.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("admin.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_db(config, db_service).await
    }

    /// Initialize all services over an existing database handle
    ///
    /// Tests use this with [`DbService::memory`].
    pub async fn with_db(config: &Config, db_service: DbService) -> Self {
        let db = db_service.db;

        let (audit, audit_rx) = AuditService::new(db.clone(), config.audit_buffer_size);
        tokio::spawn(AuditWorker::new(audit.storage().clone()).run(audit_rx));

        let config_store = ConfigStore::new(db.clone());
        let account_admin = AccountAdmin::new(db.clone(), config_store.clone());

        let state = Self {
            config: config.clone(),
            db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            config_store,
            account_admin,
            audit,
            login_throttle: Arc::new(LoginThrottle::new()),
        };

        state.seed().await;
        state
    }

    /// Seed default roles and the bootstrap administrator (idempotent)
    async fn seed(&self) {
        let roles = RoleRepository::new(self.db.clone());
        if let Err(e) = roles.seed_defaults().await {
            tracing::error!(error = %e, "Failed to seed default roles");
            return;
        }

        let accounts = AccountRepository::new(self.db.clone());
        match accounts.find_live_by_username(&self.config.admin_username).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let password = match &self.config.admin_initial_password {
                    Some(p) => p.clone(),
                    None if self.config.is_development() => {
                        tracing::warn!(
                            "ADMIN_INITIAL_PASSWORD not set; using the development default"
                        );
                        "admin123".to_string()
                    }
                    None => {
                        tracing::error!(
                            "ADMIN_INITIAL_PASSWORD not set; no bootstrap administrator created"
                        );
                        return;
                    }
                };

                let admin_role = match RoleRepository::new(self.db.clone())
                    .find_by_name("admin")
                    .await
                {
                    Ok(Some(role)) => match role.id {
                        Some(id) => id,
                        None => return,
                    },
                    _ => return,
                };

                match accounts
                    .create_system(&self.config.admin_username, &password, admin_role)
                    .await
                {
                    Ok(_) => {
                        tracing::info!(
                            username = %self.config.admin_username,
                            "Bootstrap administrator created"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create bootstrap administrator");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to check for bootstrap administrator");
            }
        }
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// JWT service handle
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
