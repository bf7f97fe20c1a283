pub mod json_store;
pub mod memory;
pub mod schema;

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const CURRENT_SESSION_KEY: &str = "current_session";
pub const EXAM_HISTORY_KEY: &str = "exam_history";
pub const VOCAB_MASTERY_KEY: &str = "vocab_mastery";
pub const VOCAB_SESSIONS_KEY: &str = "vocab_sessions";

/// Opaque key-value persistence boundary. The engines treat absent keys as
/// empty collections; an unreadable blob surfaces as an error rather than
/// silently fabricating fresh data.
pub trait StateStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>>;
    fn save_raw(&self, key: &str, json: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("corrupt data under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Absent key → default; present but unparseable → `StoreError::Corrupt`.
pub fn load_or_default<T>(store: &impl StateStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    Ok(load_optional(store, key)?.unwrap_or_default())
}

pub fn load_optional<T>(store: &impl StateStore, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match store.load_raw(key)? {
        None => Ok(None),
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| {
                StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }
                .into()
            }),
    }
}

pub fn save<T: Serialize>(store: &impl StateStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    store.save_raw(key, &json)
}
