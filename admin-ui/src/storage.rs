//! Browser storage
//!
//! `localStorage` behind the shell's [`StoragePort`].

use admin_shell::{ShellError, ShellResult, StoragePort};

/// Key of the optional backend base URL override
pub const BASE_URL_KEY: &str = "adminBaseUrl";

fn local_storage() -> ShellResult<web_sys::Storage> {
    web_sys::window()
        .ok_or_else(|| ShellError::Storage("no window".to_string()))?
        .local_storage()
        .map_err(|e| ShellError::Storage(format!("{:?}", e)))?
        .ok_or_else(|| ShellError::Storage("localStorage unavailable".to_string()))
}

/// [`StoragePort`] over `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl StoragePort for LocalStorage {
    fn get(&self, key: &str) -> ShellResult<Option<String>> {
        local_storage()?
            .get_item(key)
            .map_err(|e| ShellError::Storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> ShellResult<()> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| ShellError::Storage(format!("{:?}", e)))
    }

    fn clear(&self, key: &str) -> ShellResult<()> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| ShellError::Storage(format!("{:?}", e)))
    }
}

/// Backend base URL: the stored override, else the page's own origin
pub fn get_base_url() -> String {
    let url = LocalStorage
        .get(BASE_URL_KEY)
        .ok()
        .flatten()
        .or_else(|| web_sys::window().and_then(|w| w.location().origin().ok()))
        .unwrap_or_default();
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let storage = LocalStorage;
        storage.set("adminLastUrl", "/payments").unwrap();
        assert_eq!(storage.get("adminLastUrl").unwrap().as_deref(), Some("/payments"));

        storage.clear("adminLastUrl").unwrap();
        assert_eq!(storage.get("adminLastUrl").unwrap(), None);
    }
}
