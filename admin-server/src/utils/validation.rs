//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on reasonable UX limits for names,
//! departments and usernames; the embedded store enforces no
//! lengths of its own.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person and role names
pub const MAX_NAME_LEN: usize = 200;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 64;

/// Department names, employee numbers and other short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Free-text notes and reasons
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_required_text() {
        assert!(validate_required_text("", "username", MAX_USERNAME_LEN).is_err());
        assert!(validate_required_text("   ", "username", MAX_USERNAME_LEN).is_err());
        assert!(validate_required_text("jdoe", "username", MAX_USERNAME_LEN).is_ok());
    }

    #[test]
    fn rejects_overlong_text() {
        let long = "x".repeat(MAX_USERNAME_LEN + 1);
        assert!(validate_required_text(&long, "username", MAX_USERNAME_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "note", MAX_USERNAME_LEN).is_err());
        assert!(validate_optional_text(&None, "note", MAX_USERNAME_LEN).is_ok());
    }
}
