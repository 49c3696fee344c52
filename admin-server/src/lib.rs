//! Attendance Admin Server
//!
//! Administration backend for an employee/professor attendance product.
//! It owns two things and nothing else:
//!
//! - the organization's **versioned attendance configuration**
//!   (schedules, attendance rules, reporting, security, notifications,
//!   holidays), mutated only through validated, serialized patches
//! - the **account records** administered against that configuration
//!   (create, edit, reset password, deactivate, archive, bulk import)
//!
//! # Module structure
//!
//! ```text
//! admin-server/src/
//! ├── core/          # config, state, server bootstrap
//! ├── auth/          # JWT, middleware, login throttle
//! ├── settings/      # versioned configuration store + validator
//! ├── accounts/      # account lifecycle + bulk import
//! ├── audit/         # hash-chained audit trail
//! ├── db/            # embedded SurrealDB models + repositories
//! ├── handler/       # HTTP handlers
//! ├── routes/        # route registration + middleware stack
//! └── utils/         # errors, logging, time, validation
//! ```

pub mod accounts;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod handler;
pub mod routes;
pub mod settings;
pub mod utils;

// Re-export common types
pub use accounts::AccountAdmin;
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use settings::ConfigStore;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, work directory, logging
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let logs_dir = config.logs_dir();
    init_logger_with_file(&config.log_level, config.is_production(), Some(&logs_dir))?;

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ___       __          _           __          __
   /   | ____/ /___ ___  (_)___      / /_  __  __/ /_
  / /| |/ __  / __ `__ \/ / __ \    / __ \/ / / / __ \
 / ___ / /_/ / / / / / / / / / /   / / / / /_/ / /_/ /
/_/  |_\__,_/_/ /_/ /_/_/_/ /_/   /_/ /_/\__,_/_.___/

        attendance administration server
    "#
    );
}
