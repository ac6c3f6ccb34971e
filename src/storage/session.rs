//! Ephemeral session-scoped key/value storage.
//!
//! Holds what lives only as long as the app session: the current lesson text, the learner
//! profile, cached transformations, and the "already played" flag for the startup intro.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Pasted or uploaded lesson text
pub const LESSON_CONTENT_KEY: &str = "neuroadapt-content";

/// Learner profile saved from the preferences screen
pub const LEARNER_PROFILE_KEY: &str = "neuroadapt-learner-profile";

/// Set once the startup intro has been spoken
pub const STARTUP_VOICE_PLAYED_KEY: &str = "neuroadapt-startup-voice-played";

/// Prefix for cached transformation results
pub const TRANSFORM_CACHE_PREFIX: &str = "neuroadapt-transformed-";

/// Session store shared between screens
pub type SharedSession = Arc<Mutex<SessionStore>>;

#[derive(Debug, Default)]
pub struct SessionStore {
    values: HashMap<String, Value>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Deserialize the value under `key`; None if missing or of another shape
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Serialize and store `value`; values that fail to serialize are not stored
    pub fn set_as<T: Serialize>(&mut self, key: impl Into<String>, value: &T) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(v) => {
                self.values.insert(key, v);
            }
            Err(e) => crate::warn!("Not storing {}: {}", key, e),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Flag stored as the string "1"
    pub fn flag(&self, key: &str) -> bool {
        self.get_str(key) == Some("1")
    }

    pub fn set_flag(&mut self, key: &str) {
        self.set(key, "1");
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
