//! Bulk Import Types
//!
//! Tabular input for batch account creation. Rows are independent units
//! of work: one malformed row fails alone and never aborts the batch.

use serde::{Deserialize, Serialize};

use crate::db::models::Account;
use crate::utils::AppError;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_USERNAME_LEN, validate_required_text,
};

/// One row of tabular import input
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRow {
    pub full_name: String,
    pub employee_no: String,
    pub department: String,
    pub username: String,
}

impl ImportRow {
    /// Field-level checks that need no database access
    pub fn validate(&self, username_min_length: u32) -> Result<(), AppError> {
        validate_required_text(&self.full_name, "full_name", MAX_NAME_LEN)?;
        validate_required_text(&self.employee_no, "employee_no", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.department, "department", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.username, "username", MAX_USERNAME_LEN)?;

        if self.username.trim().len() < username_min_length as usize {
            return Err(AppError::validation(format!(
                "username must be at least {} characters",
                username_min_length
            )));
        }
        Ok(())
    }
}

/// Per-row outcome of a bulk import, reported in input order
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    Created {
        row: usize,
        account: Account,
        /// Plaintext leaves the server exactly once, like a password reset
        temporary_password: String,
    },
    Failed {
        row: usize,
        reason: String,
    },
}

impl RowOutcome {
    pub fn row(&self) -> usize {
        match self {
            Self::Created { row, .. } | Self::Failed { row, .. } => *row,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Batch summary returned alongside the per-row report
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub rows: Vec<RowOutcome>,
}

impl ImportReport {
    pub fn from_rows(rows: Vec<RowOutcome>) -> Self {
        let created = rows.iter().filter(|r| r.is_created()).count();
        Self {
            total: rows.len(),
            created,
            failed: rows.len() - created,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str) -> ImportRow {
        ImportRow {
            full_name: "Ada Lovelace".into(),
            employee_no: "EMP-100".into(),
            department: "Computing".into(),
            username: username.into(),
        }
    }

    #[test]
    fn accepts_complete_rows() {
        assert!(row("alovelace").validate(3).is_ok());
    }

    #[test]
    fn rejects_short_usernames() {
        assert!(row("al").validate(3).is_err());
    }

    #[test]
    fn rejects_blank_fields() {
        let mut bad = row("alovelace");
        bad.department = "  ".into();
        assert!(bad.validate(3).is_err());
    }
}
