//! Account Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Account, AccountCreate, AccountStatus, AccountUpdate, RoleId};
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active accounts
    pub async fn find_all(&self) -> RepoResult<Vec<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account WHERE status = 'active' ORDER BY username")
            .await?
            .take(0)?;
        Ok(accounts)
    }

    /// Find all accounts including deactivated and archived
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account ORDER BY username")
            .await?
            .take(0)?;
        Ok(accounts)
    }

    /// Find account by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let account: Option<Account> = self.base.db().select(thing).await?;
        Ok(account)
    }

    /// Find a live (non-archived) account holding the username
    ///
    /// Archived accounts release their username for reuse; account ids,
    /// not usernames, key historical attendance data.
    pub async fn find_live_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM account WHERE username = $username AND status != 'archived' LIMIT 1",
            )
            .bind(("username", username_owned))
            .await?;
        let accounts: Vec<Account> = result.take(0)?;
        Ok(accounts.into_iter().next())
    }

    /// Create a new account
    pub async fn create(&self, data: AccountCreate, role: RoleId) -> RepoResult<Account> {
        // Username unique among live accounts
        if self.find_live_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let hash_pass = Account::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE account SET
                    username = $username,
                    full_name = $full_name,
                    department = $department,
                    employee_no = $employee_no,
                    hash_pass = $hash_pass,
                    role = $role,
                    status = 'active',
                    is_system = false,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("full_name", data.full_name))
            .bind(("department", data.department))
            .bind(("employee_no", data.employee_no))
            .bind(("hash_pass", hash_pass))
            .bind(("role", role))
            .bind(("now", now))
            .await?;

        let created: Option<Account> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create account".to_string()))
    }

    /// Create the bootstrap system account (no duplicate check by id-less
    /// callers; guarded by `find_live_by_username` upstream)
    pub async fn create_system(
        &self,
        username: &str,
        password: &str,
        role: RoleId,
    ) -> RepoResult<Account> {
        let hash_pass = Account::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE account SET
                    username = $username,
                    full_name = $username,
                    department = 'administration',
                    employee_no = 'SYSTEM',
                    hash_pass = $hash_pass,
                    role = $role,
                    status = 'active',
                    is_system = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("username", username.to_string()))
            .bind(("hash_pass", hash_pass))
            .bind(("role", role))
            .bind(("now", now))
            .await?;

        let created: Option<Account> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create system account".to_string()))
    }

    /// Update an account's editable fields
    ///
    /// Archived accounts are immutable. System accounts keep their
    /// username and role.
    pub async fn update(&self, id: &str, data: AccountUpdate) -> RepoResult<Account> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))?;

        if existing.status == AccountStatus::Archived {
            return Err(RepoError::Validation(
                "Archived accounts cannot be edited".to_string(),
            ));
        }

        if existing.is_system && (data.username.is_some() || data.role.is_some()) {
            return Err(RepoError::Validation(
                "System account username and role cannot change".to_string(),
            ));
        }

        // Check duplicate username if changing
        if let Some(ref new_username) = data.username
            && new_username != &existing.username
            && self.find_live_by_username(new_username).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                new_username
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    username = $username OR username,
                    full_name = $full_name OR full_name,
                    department = $department OR department,
                    employee_no = $employee_no OR employee_no,
                    role = IF $has_role THEN $role ELSE role END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("username", data.username))
            .bind(("full_name", data.full_name))
            .bind(("department", data.department))
            .bind(("employee_no", data.employee_no))
            .bind(("has_role", data.role.is_some()))
            .bind(("role", data.role))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Account>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }

    /// Replace an account's password hash
    pub async fn set_password_hash(&self, id: &str, hash_pass: String) -> RepoResult<Account> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET hash_pass = $hash_pass, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("hash_pass", hash_pass))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Account>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }

    /// Move an account along the lifecycle
    ///
    /// Re-entering the current status is a no-op returning the record
    /// unchanged; moving backwards is a validation error.
    pub async fn set_status(&self, id: &str, next: AccountStatus) -> RepoResult<Account> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))?;

        if existing.status == next {
            return Ok(existing);
        }
        if !existing.status.can_transition_to(next) {
            return Err(RepoError::Validation(format!(
                "Cannot move account from {} to {}",
                existing.status, next
            )));
        }
        if existing.is_system {
            return Err(RepoError::Validation(
                "System account cannot be deactivated".to_string(),
            ));
        }

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", next))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Account>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }
}
