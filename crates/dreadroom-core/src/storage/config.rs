//! TOML-based game configuration.
//!
//! Stores:
//! - Tension timings (tick period, degradation budget, ambience loop)
//! - The cosmetic countdown length
//! - Dialogue lines and typewriter speed
//! - Puzzle codes
//!
//! Configuration is stored at `~/.config/dreadroom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::puzzle::{CodeLock, Keypad};
use crate::tension::TensionConfig;

/// Visible countdown configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_countdown_ms")]
    pub duration_ms: u64,
}

/// Hint dialogue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueConfig {
    #[serde(default = "default_char_interval_ms")]
    pub char_interval_ms: u64,
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
    #[serde(default = "default_lines")]
    pub lines: Vec<String>,
}

/// Puzzle answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    #[serde(default = "default_lock_combination")]
    pub lock_combination: Vec<u8>,
    #[serde(default = "default_keypad_code")]
    pub keypad_code: String,
}

/// Game configuration.
///
/// Serialized to/from TOML at `~/.config/dreadroom/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tension: TensionConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
    #[serde(default)]
    pub puzzles: PuzzleConfig,
}

// Default functions
fn default_countdown_ms() -> u64 {
    90_000
}
fn default_char_interval_ms() -> u64 {
    20
}
fn default_close_delay_ms() -> u64 {
    1_000
}
fn default_lock_combination() -> Vec<u8> {
    vec![6, 7, 4, 1]
}
fn default_keypad_code() -> String {
    "538927".into()
}
fn default_lines() -> Vec<String> {
    [
        "A minute. No more. Under the bed there is a book, and in the book a cipher.",
        "The numbers on the wall answer the cipher. They open the box. The box holds a remote.",
        "The television remembers the way out. Read it, remember it, take it to the door.",
        "You keep asking. I am not patient and I am getting hungry.",
        "Ask me one more time and you will stay here with the others.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_countdown_ms(),
        }
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            char_interval_ms: default_char_interval_ms(),
            close_delay_ms: default_close_delay_ms(),
            lines: default_lines(),
        }
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            lock_combination: default_lock_combination(),
            keypad_code: default_keypad_code(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tension: TensionConfig::default(),
            countdown: CountdownConfig::default(),
            dialogue: DialogueConfig::default(),
            puzzles: PuzzleConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if the file cannot be read or parsed,
    /// and a validation error if the values are inconsistent.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::SaveFailed` if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, keeping the existing value's type.
    /// Does not persist; call `save` afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result does not validate.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the first inconsistent value.
    pub fn validate(&self) -> Result<()> {
        self.tension.validate()?;
        CodeLock::new(self.puzzles.lock_combination.clone())?;
        Keypad::new(self.puzzles.keypad_code.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.tension.tick_period_ms, 600);
        assert_eq!(parsed.countdown.duration_ms, 90_000);
        assert_eq!(parsed.puzzles.keypad_code, "538927");
        assert_eq!(parsed.dialogue.lines.len(), 5);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("tension.max_degradation").as_deref(), Some("100"));
        assert_eq!(cfg.get("puzzles.keypad_code").as_deref(), Some("538927"));
        assert_eq!(cfg.get("puzzles.lock_combination").as_deref(), Some("[6,7,4,1]"));
        assert!(cfg.get("tension.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("tension.tick_period_ms", "900").unwrap();
        assert_eq!(cfg.tension.tick_period_ms, 900);
    }

    #[test]
    fn set_updates_array_from_json() {
        let mut cfg = Config::default();
        cfg.set("puzzles.lock_combination", "[1,2,3]").unwrap();
        assert_eq!(cfg.puzzles.lock_combination, vec![1, 2, 3]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("tension.nonexistent", "1").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("tension.tick_period_ms", "fast").is_err());
        assert_eq!(cfg.tension.tick_period_ms, 600);
    }

    #[test]
    fn set_rejects_values_that_fail_validation() {
        let mut cfg = Config::default();
        assert!(cfg.set("tension.max_degradation", "0").is_err());
        assert!(cfg.set("puzzles.keypad_code", "12ab").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.tension.max_degradation = 150;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tension.deadline_ms(), 90_000);
    }

    #[test]
    fn load_from_reports_path_on_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tension = 3").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
