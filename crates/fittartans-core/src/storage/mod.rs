mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, creating it if needed.
///
/// `FITTARTANS_HOME` overrides the location outright. Otherwise this is
/// `~/.config/fittartans[-dev]/`, with the `-dev` suffix selected by
/// `FITTARTANS_ENV=dev`.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FITTARTANS_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir().ok_or(ConfigError::NoDataDir)?.join(".config");
            let env = std::env::var("FITTARTANS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("fittartans-dev")
            } else {
                base_dir.join("fittartans")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
