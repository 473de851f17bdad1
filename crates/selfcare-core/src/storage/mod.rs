mod config;
pub mod database;

pub use config::{ActivityConfig, CalendarConfig, Config, ExperienceConfig, RecommendationsConfig};
pub use database::Database;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, DecodeError, StorageError};

/// Keys of the persisted documents.
pub mod keys {
    pub const HABITS: &str = "user_habits";
    pub const USER: &str = "user_data";
    pub const ACTIVITIES: &str = "recent_activities";
    pub const MOOD_ENTRIES: &str = "moodEntries";
    pub const RECOMMENDATIONS: &str = "recommendations";
    pub const PREFERENCES: &str = "userPreferences";
    pub const ENGAGEMENT_HISTORY: &str = "engagement_history";
    pub const ACHIEVEMENT_CATALOG: &str = "achievement_catalog";
    pub const ACTIVITY_HISTORY: &str = "activity_history";
    pub const NOTIFICATION_HISTORY: &str = "notification_history";
}

/// String-keyed document store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `SELFCARE_DATA_DIR` wins; otherwise `~/.config/selfcare[-dev]/` based on
/// `SELFCARE_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("SELFCARE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SELFCARE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("selfcare-dev")
            } else {
                base_dir.join("selfcare")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Decode the document under `key`. A missing key is `Ok(None)`.
///
/// # Errors
/// Returns `DecodeError` when the stored JSON does not match `T`, and a
/// storage error when the read itself fails.
pub fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, CoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| {
            DecodeError {
                key: key.to_string(),
                source,
            }
            .into()
        })
}

/// Decode-or-default: any failure is logged and replaced by `T::default()`.
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable stored value");
            T::default()
        }
    }
}

/// Encode and write `value` under `key`.
///
/// # Errors
/// Returns an error if encoding or the write fails.
pub fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), CoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)?;
    Ok(())
}

/// Best-effort write: failures are logged and swallowed.
pub fn save_best_effort<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = save(store, key, value) {
        tracing::warn!(key, error = %e, "failed to persist; keeping in-memory state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Store whose writes always fail.
    struct ReadOnlyStore(RefCell<HashMap<String, String>>);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.0.borrow().get(key).cloned())
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn load_missing_key_is_none() {
        let db = Database::open_memory().unwrap();
        let value: Option<Vec<u32>> = load(&db, "absent").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn load_corrupt_value_reports_decode_error() {
        let db = Database::open_memory().unwrap();
        db.set(keys::HABITS, "{not json").unwrap();
        let err = load::<Vec<u32>>(&db, keys::HABITS).unwrap_err();
        assert!(matches!(err, CoreError::Decode(ref d) if d.key == keys::HABITS));
    }

    #[test]
    fn load_or_default_recovers_from_corruption() {
        let db = Database::open_memory().unwrap();
        db.set(keys::MOOD_ENTRIES, "42").unwrap();
        let value: Vec<String> = load_or_default(&db, keys::MOOD_ENTRIES);
        assert!(value.is_empty());
    }

    #[test]
    fn save_then_load() {
        let db = Database::open_memory().unwrap();
        save(&db, "numbers", &vec![1, 2, 3]).unwrap();
        let back: Option<Vec<i32>> = load(&db, "numbers").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[test]
    fn save_best_effort_swallows_write_failure() {
        let store = ReadOnlyStore(RefCell::new(HashMap::new()));
        assert!(save(&store, "k", &1).is_err());
        save_best_effort(&store, "k", &1);
        assert!(store.get("k").unwrap().is_none());
    }
}
