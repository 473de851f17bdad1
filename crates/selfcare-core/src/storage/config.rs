//! TOML-based application configuration.
//!
//! Holds the tunables of the engines:
//! - Experience awards and level step
//! - Recent-activity feed capacity
//! - Recommendation listing and engagement normalisation
//! - Calendar offset used for day boundaries
//!
//! Configuration is stored at `~/.config/selfcare/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::DayClock;
use crate::error::ConfigError;

/// Experience points per action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceConfig {
    #[serde(default = "default_habit_completion")]
    pub habit_completion: u64,
    #[serde(default = "default_streak_bonus")]
    pub streak_bonus: u64,
    /// Streak length beyond which the bonus stops growing.
    #[serde(default = "default_streak_bonus_cap")]
    pub streak_bonus_cap: u32,
    #[serde(default = "default_achievement_unlock")]
    pub achievement_unlock: u64,
    /// Level N is reached at N * level_step experience.
    #[serde(default = "default_level_step")]
    pub level_step: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationsConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Interactions per day that count as full engagement.
    #[serde(default = "default_engagement_ceiling")]
    pub engagement_ceiling: u32,
    /// Insert the built-in catalog when no recommendations are stored.
    #[serde(default = "default_true")]
    pub seed_catalog: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Minutes east of UTC. Unset means the system's local offset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/selfcare/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub experience: ExperienceConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub recommendations: RecommendationsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

/// Largest offset magnitude, in minutes, that still names a valid zone.
const MAX_UTC_OFFSET_MINUTES: i32 = 1439;

fn default_habit_completion() -> u64 {
    10
}
fn default_streak_bonus() -> u64 {
    5
}
fn default_streak_bonus_cap() -> u32 {
    10
}
fn default_achievement_unlock() -> u64 {
    100
}
fn default_level_step() -> u64 {
    100
}
fn default_max_recent() -> usize {
    50
}
fn default_limit() -> usize {
    3
}
fn default_engagement_ceiling() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            habit_completion: default_habit_completion(),
            streak_bonus: default_streak_bonus(),
            streak_bonus_cap: default_streak_bonus_cap(),
            achievement_unlock: default_achievement_unlock(),
            level_step: default_level_step(),
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            max_recent: default_max_recent(),
        }
    }
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            engagement_ceiling: default_engagement_ceiling(),
            seed_catalog: true,
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
        if parts.peek().is_none() || key.is_empty() {
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
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    // Optional numbers (utc_offset_minutes) are stored as null until set.
                    serde_json::Value::Number(_) | serde_json::Value::Null => {
                        if value == "none" {
                            serde_json::Value::Null
                        } else if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as integer")));
                        }
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

    /// `config.toml` in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk, writing the defaults when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for a UTC offset beyond a day either way.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(minutes) = self.calendar.utc_offset_minutes {
            if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
                return Err(ConfigError::InvalidValue {
                    key: "calendar.utc_offset_minutes".to_string(),
                    message: format!(
                        "{minutes} is outside -{MAX_UTC_OFFSET_MINUTES}..={MAX_UTC_OFFSET_MINUTES}"
                    ),
                });
            }
        }
        Ok(())
    }

    /// Calendar used for day boundaries.
    pub fn day_clock(&self) -> DayClock {
        match self.calendar.utc_offset_minutes {
            Some(minutes) => DayClock::from_offset_minutes(minutes),
            None => DayClock::system(),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }
}
