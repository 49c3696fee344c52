//! Configuration Validator
//!
//! Pure validation of a candidate settings document. No database access,
//! no hidden state, never mutates input — an empty violation list means
//! the candidate may be committed.

use serde::{Deserialize, Serialize};

use crate::db::models::{KNOWN_LEAVE_TYPES, OrgSettings};
use crate::utils::time::{parse_date, parse_hhmm, shift_duration_minutes};

/// One broken constraint in a candidate document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Settings category the violation belongs to
    pub category: String,
    /// Offending field
    pub field: String,
    pub message: String,
}

impl Violation {
    fn new(
        category: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.category, self.field, self.message)
    }
}

/// Upper bound accepted for password_min_length
const MAX_PASSWORD_MIN_LENGTH: u32 = 64;

/// Upper bound accepted for username_min_length
const MAX_USERNAME_MIN_LENGTH: u32 = 32;

/// Validate a candidate settings document against all category rules
pub fn validate(candidate: &OrgSettings) -> Vec<Violation> {
    let mut violations = Vec::new();

    validate_user_management(candidate, &mut violations);
    validate_schedule(candidate, &mut violations);
    validate_attendance(candidate, &mut violations);
    validate_reports(candidate, &mut violations);
    validate_security(candidate, &mut violations);
    validate_notifications(candidate, &mut violations);
    validate_holidays(candidate, &mut violations);

    violations
}

fn validate_user_management(candidate: &OrgSettings, out: &mut Vec<Violation>) {
    let um = &candidate.user_management;
    if um.default_role.trim().is_empty() {
        out.push(Violation::new(
            "user_management",
            "default_role",
            "Default role must not be empty",
        ));
    }
    if um.username_min_length == 0 || um.username_min_length > MAX_USERNAME_MIN_LENGTH {
        out.push(Violation::new(
            "user_management",
            "username_min_length",
            format!("Must be between 1 and {MAX_USERNAME_MIN_LENGTH}"),
        ));
    }
}

fn validate_schedule(candidate: &OrgSettings, out: &mut Vec<Violation>) {
    let schedule = &candidate.schedule;

    if parse_hhmm(&schedule.shift_start).is_none() {
        out.push(Violation::new(
            "schedule",
            "shift_start",
            format!("'{}' is not a valid HH:MM time", schedule.shift_start),
        ));
    }
    if parse_hhmm(&schedule.shift_end).is_none() {
        out.push(Violation::new(
            "schedule",
            "shift_end",
            format!("'{}' is not a valid HH:MM time", schedule.shift_end),
        ));
    }

    // Duration-dependent rules only make sense once both bounds parse
    match shift_duration_minutes(&schedule.shift_start, &schedule.shift_end) {
        Some(duration) => {
            if schedule.grace_period_minutes >= duration {
                out.push(Violation::new(
                    "schedule",
                    "grace_period_minutes",
                    format!(
                        "Grace period ({} min) must be less than the shift duration ({} min)",
                        schedule.grace_period_minutes, duration
                    ),
                ));
            }
            if schedule.overtime_threshold_minutes <= duration {
                out.push(Violation::new(
                    "schedule",
                    "overtime_threshold_minutes",
                    format!(
                        "Overtime threshold ({} min) must exceed the shift duration ({} min)",
                        schedule.overtime_threshold_minutes, duration
                    ),
                ));
            }
        }
        None => {
            if parse_hhmm(&schedule.shift_start).is_some()
                && parse_hhmm(&schedule.shift_end).is_some()
            {
                out.push(Violation::new(
                    "schedule",
                    "shift_end",
                    "Shift end must be after shift start",
                ));
            }
        }
    }

    if schedule.work_days.is_empty() {
        out.push(Violation::new(
            "schedule",
            "work_days",
            "At least one working day is required",
        ));
    }
    for day in &schedule.work_days {
        if !(1u8..=7).contains(day) {
            out.push(Violation::new(
                "schedule",
                "work_days",
                format!("Day {} is not in 1..=7 (Mon..Sun)", day),
            ));
        }
    }
}

fn validate_attendance(candidate: &OrgSettings, out: &mut Vec<Violation>) {
    let attendance = &candidate.attendance;

    if attendance.absent_after_minutes == 0 {
        out.push(Violation::new(
            "attendance",
            "absent_after_minutes",
            "Must be positive",
        ));
    }
    if attendance.leave_types.is_empty() {
        out.push(Violation::new(
            "attendance",
            "leave_types",
            "At least one leave type is required",
        ));
    }
    for leave_type in &attendance.leave_types {
        if !KNOWN_LEAVE_TYPES.contains(&leave_type.as_str()) {
            out.push(Violation::new(
                "attendance",
                "leave_types",
                format!(
                    "Unknown leave type '{}' (known: {})",
                    leave_type,
                    KNOWN_LEAVE_TYPES.join(", ")
                ),
            ));
        }
    }
}

fn validate_reports(candidate: &OrgSettings, out: &mut Vec<Violation>) {
    let reports = &candidate.reports;

    if reports.export_formats.is_empty() {
        out.push(Violation::new(
            "reports",
            "export_formats",
            "At least one export format is required",
        ));
    }
    if reports.retention_days == 0 {
        out.push(Violation::new(
            "reports",
            "retention_days",
            "Must be positive",
        ));
    }
}

fn validate_security(candidate: &OrgSettings, out: &mut Vec<Violation>) {
    let security = &candidate.security;

    if security.session_timeout_minutes == 0 {
        out.push(Violation::new(
            "security",
            "session_timeout_minutes",
            "Must be positive",
        ));
    }
    if security.auto_logout_minutes == 0 {
        out.push(Violation::new(
            "security",
            "auto_logout_minutes",
            "Must be positive",
        ));
    }
    if security.password_min_length < 4 || security.password_min_length > MAX_PASSWORD_MIN_LENGTH {
        out.push(Violation::new(
            "security",
            "password_min_length",
            format!("Must be between 4 and {MAX_PASSWORD_MIN_LENGTH}"),
        ));
    }
    if security.max_failed_logins == 0 {
        out.push(Violation::new(
            "security",
            "max_failed_logins",
            "Must be positive",
        ));
    }
}

fn validate_notifications(candidate: &OrgSettings, out: &mut Vec<Violation>) {
    let notifications = &candidate.notifications;

    if parse_hhmm(&notifications.summary_time).is_none() {
        out.push(Violation::new(
            "notifications",
            "summary_time",
            format!("'{}' is not a valid HH:MM time", notifications.summary_time),
        ));
    }
}

fn validate_holidays(candidate: &OrgSettings, out: &mut Vec<Violation>) {
    let holidays = &candidate.holidays.holidays;

    let mut seen = std::collections::HashSet::new();
    for holiday in holidays {
        if parse_date(&holiday.date).is_none() {
            out.push(Violation::new(
                "holidays",
                "date",
                format!("'{}' is not a valid YYYY-MM-DD date", holiday.date),
            ));
        } else if !seen.insert(holiday.date.as_str()) {
            out.push(Violation::new(
                "holidays",
                "date",
                format!("Duplicate holiday date '{}'", holiday.date),
            ));
        }
        if holiday.name.trim().is_empty() {
            out.push(Violation::new(
                "holidays",
                "name",
                format!("Holiday on '{}' has no name", holiday.date),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Holiday, HolidaySettings, ScheduleSettings};

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&OrgSettings::default()).is_empty());
    }

    #[test]
    fn grace_period_must_fit_inside_shift() {
        // 09:00-18:00 is a 540-minute shift; a 600-minute grace period
        // must be rejected
        let mut candidate = OrgSettings::default();
        candidate.schedule = ScheduleSettings {
            shift_start: "09:00".into(),
            shift_end: "18:00".into(),
            grace_period_minutes: 600,
            ..ScheduleSettings::default()
        };

        let violations = validate(&candidate);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "grace_period_minutes");
    }

    #[test]
    fn overtime_threshold_must_exceed_shift() {
        let mut candidate = OrgSettings::default();
        candidate.schedule.overtime_threshold_minutes = 540; // == duration

        let violations = validate(&candidate);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "overtime_threshold_minutes");
    }

    #[test]
    fn inverted_shift_is_rejected() {
        let mut candidate = OrgSettings::default();
        candidate.schedule.shift_start = "18:00".into();
        candidate.schedule.shift_end = "09:00".into();

        let violations = validate(&candidate);
        assert!(violations.iter().any(|v| v.field == "shift_end"));
    }

    #[test]
    fn unknown_leave_type_is_rejected() {
        let mut candidate = OrgSettings::default();
        candidate.attendance.leave_types.push("sabbatical-ish".into());

        let violations = validate(&candidate);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, "attendance");
    }

    #[test]
    fn duplicate_holidays_are_rejected() {
        let mut candidate = OrgSettings::default();
        candidate.holidays = HolidaySettings {
            holidays: vec![
                Holiday {
                    date: "2026-01-01".into(),
                    name: "New Year".into(),
                },
                Holiday {
                    date: "2026-01-01".into(),
                    name: "Still New Year".into(),
                },
            ],
        };

        let violations = validate(&candidate);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Duplicate"));
    }

    #[test]
    fn multiple_violations_are_all_reported() {
        let mut candidate = OrgSettings::default();
        candidate.schedule.work_days.clear();
        candidate.security.max_failed_logins = 0;
        candidate.user_management.default_role = String::new();

        let violations = validate(&candidate);
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn input_is_not_mutated() {
        let candidate = OrgSettings::default();
        let before = candidate.clone();
        let _ = validate(&candidate);
        assert_eq!(candidate, before);
    }
}
