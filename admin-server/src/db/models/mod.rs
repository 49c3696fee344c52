//! Database Models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod account;
pub mod role;

// Configuration
pub mod org_config;

// Re-exports
pub use account::{
    Account, AccountCreate, AccountId, AccountStatus, AccountUpdate, TemporaryCredential,
};
pub use org_config::{
    AttendanceSettings, ExportFormat, Holiday, HolidaySettings, KNOWN_LEAVE_TYPES,
    NotificationSettings, OrgConfig, OrgSettings, OrgSettingsPatch, ReportSettings,
    ScheduleSettings, SecuritySettings, UserManagementSettings,
};
pub use role::{Role, RoleCreate, RoleId};
