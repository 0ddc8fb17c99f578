//! Key/value persistence
//!
//! One `Store` is chosen at startup: `LocalStorage` in the browser,
//! `FileStore` for native runs, `MemoryStore` for tests or when no durable
//! storage is available. Values are strings; structured values are JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Read and decode a JSON value. Missing keys and unreadable values both
/// yield `None`; the latter is logged.
pub fn load_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read {key}: {e:#}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable {key}: {e}");
            None
        }
    }
}

/// Encode a value as JSON and write it
pub fn save_json<T: Serialize>(store: &mut dyn Store, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).with_context(|| format!("Failed to encode {key}"))?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_helpers_round_trip_and_tolerate_garbage() {
        let mut store = MemoryStore::new();
        let mut value = BTreeMap::new();
        value.insert("snake".to_string(), 120u64);
        save_json(&mut store, "scores", &value).unwrap();
        assert_eq!(load_json::<BTreeMap<String, u64>>(&store, "scores"), Some(value));

        store.set("scores", "{not json").unwrap();
        assert_eq!(load_json::<BTreeMap<String, u64>>(&store, "scores"), None);
        assert_eq!(load_json::<u64>(&store, "missing"), None);
    }
}
