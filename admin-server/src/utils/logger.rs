//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent audit logs (never deleted)
//! - Permanent security logs (never deleted)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Clean up old application log files (older than 14 days)
///
/// Call this periodically (e.g., daily) to keep log size in check
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    let cutoff = chrono::Utc::now() - chrono::Duration::days(14);

    let app_log_dir = log_dir.join("app");
    if app_log_dir.exists() {
        for entry in fs::read_dir(app_log_dir)? {
            let entry = entry?;
            let path = entry.path();

            // Match app.YYYY-MM-DD pattern produced by the daily appender
            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && let Some(date_part) = name.strip_prefix("app.")
                && let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                && let Some(midnight) = naive_date.and_hms_opt(0, 0, 0)
                && midnight.and_utc() < cutoff
            {
                fs::remove_file(&path)?;
                tracing::info!(file = %name, "Deleted old log file");
            }
        }
    }

    Ok(())
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - Whether to use JSON format (true for production)
/// * `log_dir` - Optional directory for file logging
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if json_format {
        // JSON format for production
        let console_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level));

        if let Some(dir) = log_dir {
            let (app_layer, audit_layer, security_layer) = {
                let (app_log, audit_log, security_log) = make_appenders(dir)?;

                let app_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::sync::Mutex::new(app_log))
                    .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                        meta.target() != "audit" && meta.target() != "security"
                    }));

                let audit_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::sync::Mutex::new(audit_log))
                    .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                        meta.target() == "audit"
                    }));

                let security_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::sync::Mutex::new(security_log))
                    .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                        meta.target() == "security"
                    }));

                (app_layer, audit_layer, security_layer)
            };

            tokio::spawn(periodic_cleanup(dir.to_path_buf()));

            subscriber
                .with(console_layer)
                .with(app_layer)
                .with(audit_layer)
                .with(security_layer)
                .init();
        } else {
            subscriber.with(console_layer).init();
        }
    } else {
        // Pretty format for development
        let console_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level));

        if let Some(dir) = log_dir {
            let (app_log, audit_log, security_log) = make_appenders(dir)?;

            let app_layer = fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != "audit" && meta.target() != "security"
                }));

            let audit_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(audit_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "audit"
                }));

            let security_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(security_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "security"
                }));

            tokio::spawn(periodic_cleanup(dir.to_path_buf()));

            subscriber
                .with(console_layer)
                .with(app_layer)
                .with(audit_layer)
                .with(security_layer)
                .init();
        } else {
            subscriber.with(console_layer).init();
        }
    }

    Ok(())
}

/// Create the three rotating appenders (app / audit / security)
fn make_appenders(
    dir: &Path,
) -> anyhow::Result<(RollingFileAppender, RollingFileAppender, RollingFileAppender)> {
    let app_log_dir = dir.join("app");
    let audit_log_dir = dir.join("audit");
    let security_log_dir = dir.join("security");

    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&audit_log_dir)?;
    fs::create_dir_all(&security_log_dir)?;

    Ok((
        RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app"),
        RollingFileAppender::new(Rotation::DAILY, audit_log_dir, "audit"),
        RollingFileAppender::new(Rotation::DAILY, security_log_dir, "security"),
    ))
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Audit log helper - records critical administrative operations
///
/// Audit log lines are permanently stored in `audit.YYYY-MM-DD` files and
/// are never subject to the 14-day cleanup. The tamper-evident database
/// trail lives in the `audit` module; this stream is the plain-text twin.
///
/// # Examples
/// ```no_run
/// # use admin_server::audit_log;
/// audit_log!("account:admin", "login", "account:admin");
/// audit_log!("account:admin", "create", "account:jdoe", "Created professor account");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($operator:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            operator = %$operator,
            action = %$action,
            resource = %$resource,
            "AUDIT"
        );
    };
    ($operator:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            operator = %$operator,
            action = %$action,
            resource = %$resource,
            details = %$details,
            "AUDIT"
        );
    };
}

/// Security log helper - records security-related events
///
/// Security log lines are permanently stored in `security.YYYY-MM-DD` files.
///
/// # Examples
/// ```no_run
/// # use admin_server::security_log;
/// security_log!(WARN, "auth_failed", username = "admin", reason = "invalid_password");
/// security_log!(ERROR, "login_throttled", username = "admin", attempts = 7);
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            $($arg)*
        );
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(
            target: "security",
            event = $event,
            $($arg)*
        );
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            $($arg)*
        );
    };
}
