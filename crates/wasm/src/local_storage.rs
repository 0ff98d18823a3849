use chatterbox_storage::error::{BackendSnafu, UnavailableSnafu};
use chatterbox_storage::{KeyValueStore, StorageResult};
use snafu::OptionExt;
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

const BACKEND: &str = "localStorage";

/// `window.localStorage` as a key-value backend.
///
/// Browsers can deny access (private mode, sandboxed iframes); the store
/// then reports every operation as unavailable.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(Some(storage)) => Some(storage),
            Ok(None) => {
                log::warn!("localStorage is not available; persistence is disabled");
                None
            }
            Err(error) => {
                log::warn!("localStorage access was denied: {error:?}");
                None
            }
        };

        Self { storage }
    }

    fn storage(&self, stage: &'static str) -> StorageResult<&Storage> {
        self.storage.as_ref().context(UnavailableSnafu {
            stage,
            backend: BACKEND,
            details: "window.localStorage is not accessible",
        })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage("get-item")?
            .get_item(key)
            .map_err(|error| backend_error("get-item", key, &error))
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.storage("set-item")?
            .set_item(key, value)
            .map_err(|error| backend_error("set-item", key, &error))
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.storage("remove-item")?
            .remove_item(key)
            .map_err(|error| backend_error("remove-item", key, &error))
    }
}

// Quota errors surface here as `DOMException` values.
fn backend_error(
    stage: &'static str,
    key: &str,
    error: &JsValue,
) -> chatterbox_storage::StorageError {
    BackendSnafu {
        stage,
        backend: BACKEND,
        key,
        details: format!("{error:?}"),
    }
    .build()
}
