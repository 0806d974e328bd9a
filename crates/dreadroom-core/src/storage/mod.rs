mod config;

pub use config::{Config, CountdownConfig, DialogueConfig, PuzzleConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/dreadroom[-dev]/` based on DREADROOM_ENV.
///
/// Set DREADROOM_ENV=dev to use development data directory.
/// DREADROOM_HOME replaces the directory entirely.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("DREADROOM_HOME") {
        let dir = PathBuf::from(home);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DREADROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("dreadroom-dev")
    } else {
        base_dir.join("dreadroom")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
