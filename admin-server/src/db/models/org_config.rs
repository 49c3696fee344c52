//! Organization Configuration Model (Versioned)
//!
//! The organization's attendance/security/notification settings live in a
//! single document. Every accepted change produces a new row in the
//! `org_config` table with a strictly increasing version number; prior
//! rows are immutable and retained for audit.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One committed configuration version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgConfig {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Monotonically increasing version number (starts at 1)
    pub version: u64,
    /// Username of the administrator who committed this version
    pub author: String,
    /// Commit timestamp (Unix millis)
    pub committed_at: i64,
    pub settings: OrgSettings,
}

/// The full settings document, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgSettings {
    pub user_management: UserManagementSettings,
    pub schedule: ScheduleSettings,
    pub attendance: AttendanceSettings,
    pub reports: ReportSettings,
    pub security: SecuritySettings,
    pub notifications: NotificationSettings,
    pub holidays: HolidaySettings,
}

/// Account administration defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserManagementSettings {
    /// Role assigned to accounts created without an explicit role
    /// (bulk import always uses it)
    pub default_role: String,
    pub username_min_length: u32,
}

impl Default for UserManagementSettings {
    fn default() -> Self {
        Self {
            default_role: "staff".to_owned(),
            username_min_length: 3,
        }
    }
}

/// Work schedule rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Shift start, wall clock "HH:MM"
    pub shift_start: String,
    /// Shift end, wall clock "HH:MM" (must be after start, same day)
    pub shift_end: String,
    /// Allowed lateness before an arrival is marked late; strictly less
    /// than the shift duration
    pub grace_period_minutes: u32,
    /// Minutes of presence after which overtime starts accruing; strictly
    /// greater than the shift duration
    pub overtime_threshold_minutes: u32,
    /// Working days, Mon=1 .. Sun=7
    pub work_days: Vec<u8>,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            shift_start: "09:00".to_owned(),
            shift_end: "18:00".to_owned(),
            grace_period_minutes: 5,
            overtime_threshold_minutes: 600,
            work_days: vec![1, 2, 3, 4, 5],
        }
    }
}

/// Attendance marking rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceSettings {
    /// Minutes after shift start at which a missing check-in becomes an
    /// absence
    pub absent_after_minutes: u32,
    pub allow_remote_checkin: bool,
    /// Leave categories; each must come from [`KNOWN_LEAVE_TYPES`]
    pub leave_types: Vec<String>,
}

/// Leave categories the product understands
pub const KNOWN_LEAVE_TYPES: &[&str] = &[
    "annual",
    "sick",
    "unpaid",
    "maternity",
    "paternity",
    "bereavement",
    "study",
];

impl Default for AttendanceSettings {
    fn default() -> Self {
        Self {
            absent_after_minutes: 240,
            allow_remote_checkin: false,
            leave_types: vec!["annual".to_owned(), "sick".to_owned(), "unpaid".to_owned()],
        }
    }
}

/// Report export formats supported by the product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

/// Reporting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub export_formats: Vec<ExportFormat>,
    /// How long generated reports are retained, in days
    pub retention_days: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            export_formats: vec![ExportFormat::Csv, ExportFormat::Pdf],
            retention_days: 365,
        }
    }
}

/// Security settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    pub session_timeout_minutes: u32,
    pub auto_logout_minutes: u32,
    pub password_min_length: u32,
    /// Failed logins tolerated inside the throttle window before the
    /// username is temporarily locked
    pub max_failed_logins: u32,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            session_timeout_minutes: 480,
            auto_logout_minutes: 30,
            password_min_length: 8,
            max_failed_logins: 5,
        }
    }
}

/// Notification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub notify_late_arrival: bool,
    pub notify_absence: bool,
    pub daily_summary: bool,
    /// When the daily summary goes out, wall clock "HH:MM"
    pub summary_time: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            notify_late_arrival: true,
            notify_absence: true,
            daily_summary: false,
            summary_time: "17:00".to_owned(),
        }
    }
}

/// A single holiday entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    /// Calendar date "YYYY-MM-DD"
    pub date: String,
    pub name: String,
}

/// Holiday calendar settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidaySettings {
    pub holidays: Vec<Holiday>,
}

/// A proposed partial update to the settings document
///
/// Categories left as `None` keep their committed values. A patch never
/// reaches the store unless the patched candidate passes validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgSettingsPatch {
    pub user_management: Option<UserManagementSettings>,
    pub schedule: Option<ScheduleSettings>,
    pub attendance: Option<AttendanceSettings>,
    pub reports: Option<ReportSettings>,
    pub security: Option<SecuritySettings>,
    pub notifications: Option<NotificationSettings>,
    pub holidays: Option<HolidaySettings>,
}

impl OrgSettingsPatch {
    /// Apply the patch to a committed document, producing the candidate
    pub fn apply(&self, base: &OrgSettings) -> OrgSettings {
        OrgSettings {
            user_management: self
                .user_management
                .clone()
                .unwrap_or_else(|| base.user_management.clone()),
            schedule: self.schedule.clone().unwrap_or_else(|| base.schedule.clone()),
            attendance: self
                .attendance
                .clone()
                .unwrap_or_else(|| base.attendance.clone()),
            reports: self.reports.clone().unwrap_or_else(|| base.reports.clone()),
            security: self.security.clone().unwrap_or_else(|| base.security.clone()),
            notifications: self
                .notifications
                .clone()
                .unwrap_or_else(|| base.notifications.clone()),
            holidays: self.holidays.clone().unwrap_or_else(|| base.holidays.clone()),
        }
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.user_management.is_none()
            && self.schedule.is_none()
            && self.attendance.is_none()
            && self.reports.is_none()
            && self.security.is_none()
            && self.notifications.is_none()
            && self.holidays.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_keeps_untouched_categories() {
        let base = OrgSettings::default();
        let patch = OrgSettingsPatch {
            schedule: Some(ScheduleSettings {
                grace_period_minutes: 10,
                ..ScheduleSettings::default()
            }),
            ..OrgSettingsPatch::default()
        };

        let candidate = patch.apply(&base);
        assert_eq!(candidate.schedule.grace_period_minutes, 10);
        assert_eq!(candidate.security, base.security);
        assert_eq!(candidate.holidays, base.holidays);
    }

    #[test]
    fn empty_patch_is_identity() {
        let base = OrgSettings::default();
        let patch = OrgSettingsPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&base), base);
    }
}
