//! Account Administration Service
//!
//! Lifecycle operations on professor/employee records: create, edit,
//! reset password, deactivate, archive, bulk import. Records reference
//! the configuration document only for defaults (default role, username
//! and password length floors).

use rand::Rng;
use rand::distributions::Alphanumeric;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::import::{ImportRow, RowOutcome};
use crate::db::models::{
    Account, AccountCreate, AccountStatus, AccountUpdate, RoleId, TemporaryCredential,
};
use crate::db::repository::{AccountRepository, RoleRepository};
use crate::settings::ConfigStore;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MAX_USERNAME_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Temporary passwords are at least this long regardless of policy
const MIN_TEMP_PASSWORD_LEN: usize = 12;

/// Account administration facade
///
/// Cloning is cheap; clones share the underlying handles.
#[derive(Clone)]
pub struct AccountAdmin {
    accounts: AccountRepository,
    roles: RoleRepository,
    config: ConfigStore,
}

impl AccountAdmin {
    pub fn new(db: Surreal<Db>, config: ConfigStore) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            roles: RoleRepository::new(db),
            config,
        }
    }

    /// List accounts, optionally including deactivated/archived records
    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Account>> {
        let accounts = if include_inactive {
            self.accounts.find_all_with_inactive().await?
        } else {
            self.accounts.find_all().await?
        };
        Ok(accounts)
    }

    /// Fetch one account
    pub async fn get(&self, id: &str) -> AppResult<Account> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Account {} not found", id)))
    }

    /// Create an account
    ///
    /// Fails with a conflict when the username is taken by a live
    /// account. The role defaults to the configured default role.
    pub async fn create(&self, data: AccountCreate) -> AppResult<Account> {
        let settings = self.config.get().await?.settings;

        validate_required_text(&data.username, "username", MAX_USERNAME_LEN)?;
        validate_required_text(&data.full_name, "full_name", MAX_NAME_LEN)?;
        validate_required_text(&data.department, "department", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&data.employee_no, "employee_no", MAX_SHORT_TEXT_LEN)?;

        if data.username.trim().len() < settings.user_management.username_min_length as usize {
            return Err(AppError::validation(format!(
                "username must be at least {} characters",
                settings.user_management.username_min_length
            )));
        }
        if data.password.len() < settings.security.password_min_length as usize {
            return Err(AppError::validation(format!(
                "password must be at least {} characters",
                settings.security.password_min_length
            )));
        }
        if data.password.len() > MAX_PASSWORD_LEN {
            return Err(AppError::validation("password is too long"));
        }

        let role = match &data.role {
            Some(role) => self.resolve_role_id(role).await?,
            None => {
                self.resolve_role_by_name(&settings.user_management.default_role)
                    .await?
            }
        };

        let account = self.accounts.create(data, role).await?;
        tracing::info!(
            account = %account.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            username = %account.username,
            "Account created"
        );
        Ok(account)
    }

    /// Edit an account's fields
    pub async fn edit(&self, id: &str, patch: AccountUpdate) -> AppResult<Account> {
        validate_optional_text(&patch.username, "username", MAX_USERNAME_LEN)?;
        validate_optional_text(&patch.full_name, "full_name", MAX_NAME_LEN)?;
        validate_optional_text(&patch.department, "department", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&patch.employee_no, "employee_no", MAX_SHORT_TEXT_LEN)?;

        if let Some(ref username) = patch.username {
            let settings = self.config.get().await?.settings;
            if username.trim().len() < settings.user_management.username_min_length as usize {
                return Err(AppError::validation(format!(
                    "username must be at least {} characters",
                    settings.user_management.username_min_length
                )));
            }
        }

        let mut patch = patch;
        if let Some(role) = patch.role.take() {
            patch.role = Some(self.resolve_role_id(&role).await?);
        }

        Ok(self.accounts.update(id, patch).await?)
    }

    /// Issue a new temporary password
    ///
    /// The plaintext is returned exactly once; only the hash is stored.
    pub async fn reset_password(&self, id: &str) -> AppResult<TemporaryCredential> {
        let account = self.get(id).await?;
        if account.status == AccountStatus::Archived {
            return Err(AppError::validation(
                "Archived accounts cannot reset passwords",
            ));
        }

        let settings = self.config.get().await?.settings;
        let length = MIN_TEMP_PASSWORD_LEN.max(settings.security.password_min_length as usize);
        let temporary_password = generate_password(length);

        let hash = Account::hash_password(&temporary_password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
        let account = self.accounts.set_password_hash(id, hash).await?;

        Ok(TemporaryCredential {
            account_id: account
                .id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            username: account.username,
            temporary_password,
        })
    }

    /// Deactivate an account (idempotent)
    pub async fn deactivate(&self, id: &str) -> AppResult<Account> {
        Ok(self
            .accounts
            .set_status(id, AccountStatus::Deactivated)
            .await?)
    }

    /// Archive an account — terminal, releases the username
    pub async fn archive(&self, id: &str) -> AppResult<Account> {
        Ok(self.accounts.set_status(id, AccountStatus::Archived).await?)
    }

    /// Bulk import tabular rows
    ///
    /// Rows run concurrently; the report preserves input order and one
    /// failed row never rolls back the others. Duplicate usernames within
    /// the batch fail every row after the first occurrence.
    pub async fn bulk_import(&self, rows: Vec<ImportRow>) -> AppResult<Vec<RowOutcome>> {
        let settings = self.config.get().await?.settings;
        let default_role = self
            .resolve_role_by_name(&settings.user_management.default_role)
            .await?;
        let username_min_length = settings.user_management.username_min_length;
        let password_length =
            MIN_TEMP_PASSWORD_LEN.max(settings.security.password_min_length as usize);

        // Mark intra-batch duplicates up front so concurrent rows never
        // race each other on the same username
        let mut seen = std::collections::HashSet::new();
        let mut duplicate_of_batch = vec![false; rows.len()];
        for (i, row) in rows.iter().enumerate() {
            if !seen.insert(row.username.trim().to_string()) {
                duplicate_of_batch[i] = true;
            }
        }

        let tasks = rows.into_iter().enumerate().map(|(index, row)| {
            let admin = self.clone();
            let role = default_role.clone();
            let duplicate = duplicate_of_batch[index];
            async move {
                match admin
                    .import_row(index, row, role, username_min_length, password_length, duplicate)
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(e) => RowOutcome::Failed {
                        row: index,
                        reason: e.to_string(),
                    },
                }
            }
        });

        // join_all keeps input order in its output
        let outcomes = futures::future::join_all(tasks).await;
        Ok(outcomes)
    }

    #[allow(clippy::too_many_arguments)]
    async fn import_row(
        &self,
        index: usize,
        row: ImportRow,
        role: RoleId,
        username_min_length: u32,
        password_length: usize,
        duplicate_of_batch: bool,
    ) -> AppResult<RowOutcome> {
        if duplicate_of_batch {
            return Ok(RowOutcome::Failed {
                row: index,
                reason: format!("Username '{}' duplicated earlier in batch", row.username),
            });
        }
        if let Err(e) = row.validate(username_min_length) {
            return Ok(RowOutcome::Failed {
                row: index,
                reason: e.to_string(),
            });
        }

        let temporary_password = generate_password(password_length);
        let create = AccountCreate {
            username: row.username.trim().to_string(),
            password: temporary_password.clone(),
            full_name: row.full_name.trim().to_string(),
            department: row.department.trim().to_string(),
            employee_no: row.employee_no.trim().to_string(),
            role: None,
        };

        match self.accounts.create(create, role).await {
            Ok(account) => Ok(RowOutcome::Created {
                row: index,
                account,
                temporary_password,
            }),
            Err(e) => Ok(RowOutcome::Failed {
                row: index,
                reason: e.to_string(),
            }),
        }
    }

    /// Resolve and check a role referenced by id
    async fn resolve_role_id(&self, role: &RoleId) -> AppResult<RoleId> {
        let roles = self.roles.find_all().await?;
        let found = roles
            .iter()
            .any(|r| r.id.as_ref().is_some_and(|id| id == role));
        if !found {
            return Err(AppError::validation(format!("Unknown role: {}", role)));
        }
        Ok(role.clone())
    }

    /// Resolve an active role by name
    async fn resolve_role_by_name(&self, name: &str) -> AppResult<RoleId> {
        let role = self
            .roles
            .find_by_name(name)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| AppError::validation(format!("Unknown role: {}", name)))?;
        role.id
            .ok_or_else(|| AppError::internal("Role record has no id"))
    }
}

/// Random alphanumeric password
fn generate_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_have_requested_length() {
        let p = generate_password(16);
        assert_eq!(p.len(), 16);
        assert!(p.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_passwords_differ() {
        assert_ne!(generate_password(16), generate_password(16));
    }
}
