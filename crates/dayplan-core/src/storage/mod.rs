mod config;
pub mod migrations;
pub mod plan_db;

pub use config::{Config, LoggingConfig, PlannerConfig};
pub use plan_db::PlanDb;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory holding `config.toml` and `dayplan.db`.
///
/// `DAYPLAN_DATA_DIR` wins when set. Otherwise `~/.config/dayplan[-dev]/`
/// based on `DAYPLAN_ENV` (set it to `dev` for a development data directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("DAYPLAN_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("DAYPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dayplan-dev")
            } else {
                base_dir.join("dayplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
