mod config;
mod session_file;

pub use config::{BankConfig, Config, PlannerConfig, TimerConfig};
pub use session_file::SessionFile;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/biochem-study[-dev]/` based on BIOCHEM_STUDY_ENV.
///
/// Set BIOCHEM_STUDY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BIOCHEM_STUDY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("biochem-study-dev")
    } else {
        base_dir.join("biochem-study")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
