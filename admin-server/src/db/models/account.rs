//! Account Model
//!
//! A professor/employee identity record, distinct from attendance data.
//! Records are never physically deleted; the status field follows a
//! linear lifecycle with no path back from `Archived`.

use super::RoleId;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Account ID type
pub type AccountId = RecordId;

/// Account lifecycle status
///
/// active → deactivated → archived, never backwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Deactivated,
    Archived,
}

impl Default for AccountStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl AccountStatus {
    /// Whether the lifecycle permits moving to `next`.
    ///
    /// Re-entering the current status is allowed (idempotent operations);
    /// moving backwards is not.
    pub fn can_transition_to(self, next: Self) -> bool {
        self.rank() <= next.rank()
    }

    fn rank(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::Deactivated => 1,
            Self::Archived => 2,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Deactivated => write!(f, "deactivated"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// Account model matching the `account` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AccountId>,
    pub username: String,
    pub full_name: String,
    pub department: String,
    /// Employee/professor number from the HR system
    pub employee_no: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    #[serde(with = "serde_helpers::record_id")]
    pub role: RoleId,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_system: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Create account payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub department: String,
    pub employee_no: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub role: Option<RoleId>,
}

/// Update account payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_no: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub role: Option<RoleId>,
}

/// One-time credential returned by a password reset
///
/// The plaintext leaves the server exactly once; only the hash is stored.
#[derive(Debug, Clone, Serialize)]
pub struct TemporaryCredential {
    pub account_id: String,
    pub username: String,
    pub temporary_password: String,
}

impl Account {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_linear() {
        use AccountStatus::*;
        assert!(Active.can_transition_to(Deactivated));
        assert!(Deactivated.can_transition_to(Archived));
        assert!(Active.can_transition_to(Archived));

        // Idempotent re-entry
        assert!(Deactivated.can_transition_to(Deactivated));
        assert!(Archived.can_transition_to(Archived));

        // No path back
        assert!(!Archived.can_transition_to(Active));
        assert!(!Archived.can_transition_to(Deactivated));
        assert!(!Deactivated.can_transition_to(Active));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = Account::hash_password("s3cret!").unwrap();
        let account = Account {
            id: None,
            username: "jdoe".into(),
            full_name: "J. Doe".into(),
            department: "Mathematics".into(),
            employee_no: "EMP-001".into(),
            hash_pass: hash,
            role: "role:staff".parse().unwrap(),
            status: AccountStatus::Active,
            is_system: false,
            created_at: None,
            updated_at: None,
        };
        assert!(account.verify_password("s3cret!").unwrap());
        assert!(!account.verify_password("wrong").unwrap());
    }
}
