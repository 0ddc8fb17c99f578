use anyhow::{Result, anyhow};

use super::Store;

/// `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| anyhow!("No window"))?
            .local_storage()
            .map_err(|e| anyhow!("localStorage unavailable: {e:?}"))?
            .ok_or_else(|| anyhow!("localStorage disabled"))?;
        Ok(Self { storage })
    }
}

impl Store for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| anyhow!("Failed to read {key}: {e:?}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| anyhow!("Failed to write {key}: {e:?}"))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| anyhow!("Failed to remove {key}: {e:?}"))
    }
}
