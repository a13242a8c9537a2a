//! Process-wide user preferences
//!
//! Holds the reporter's own bookkeeping (last crash check, remembered e-mail)
//! and is the preference snapshot attached to reports.

mod json_store;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::core::error::Result;

pub use json_store::{JsonFilePreferenceStore, MemoryPreferenceStore};

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Copy of every stored preference
    fn snapshot(&self) -> Map<String, Value>;

    /// Timestamp stored as RFC 3339; unparsable values read as absent
    fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.get(key)?;
        let raw = raw.as_str()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!("Ignoring malformed timestamp under '{}': {}", key, e);
                None
            }
        }
    }

    fn set_timestamp(&self, key: &str, ts: DateTime<Utc>) -> Result<()> {
        self.set(key, Value::String(ts.to_rfc3339()))
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key)?.as_str().map(str::to_string)
    }
}
