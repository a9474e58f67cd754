//! `window.localStorage` backend.
//! Persistent across page reloads, scoped to the origin.

use async_trait::async_trait;
use web_sys::Storage;

use fulcrum_core::ports::StoragePort;
use fulcrum_types::{ChatError, Result};
use crate::js_error;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Grab the origin's localStorage. Fails outside a browser, or when
    /// the user agent blocks storage (e.g. some private modes).
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| ChatError::Storage("No window object".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| ChatError::Storage(js_error(e)))?
            .ok_or_else(|| ChatError::Storage("localStorage not available".to_string()))?;

        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| ChatError::Storage(js_error(e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // Quota errors surface here
        self.storage
            .set_item(key, value)
            .map_err(|e| ChatError::Storage(js_error(e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| ChatError::Storage(js_error(e)))
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}
