//! Navigation State Storage
//!
//! The shell remembers the last panel it showed through a small key/value
//! port, so the same code persists to browser `localStorage`, a JSON file on
//! disk, or plain memory in tests.
//!
//! - **memory**: process-local map
//! - **file**: JSON object persisted to a single file
//!
//! [`NavigationStore`] owns the two keys and maps them to a
//! [`NavigationState`].

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::rc::Rc;

use crate::error::ShellResult;
use crate::model::NavigationState;

/// Key holding the URL of the last panel
pub const LAST_URL_KEY: &str = "adminLastUrl";

/// Key holding the visible label of the last panel
pub const LAST_LABEL_KEY: &str = "adminLastLabel";

/// String key/value persistence backend
pub trait StoragePort {
    /// Read a value, `None` when the key was never written or was cleared
    fn get(&self, key: &str) -> ShellResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> ShellResult<()>;

    /// Remove a key; removing an absent key is not an error
    fn clear(&self, key: &str) -> ShellResult<()>;

    /// Write several values.
    ///
    /// The default writes them one at a time, so a failure part-way leaves
    /// the earlier keys updated. Backends that can commit a batch in one
    /// write override it.
    fn set_all(&self, entries: &[(&str, &str)]) -> ShellResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Typed access to the persisted [`NavigationState`]
#[derive(Clone)]
pub struct NavigationStore {
    port: Rc<dyn StoragePort>,
    home_url: String,
}

impl NavigationStore {
    pub fn new(port: Rc<dyn StoragePort>, home_url: impl Into<String>) -> Self {
        Self {
            port,
            home_url: home_url.into(),
        }
    }

    /// Load the last navigation, falling back to the home panel.
    ///
    /// A storage failure is logged and treated like an empty store.
    pub fn load(&self) -> NavigationState {
        let read = |key: &str| match self.port.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read navigation state");
                None
            }
        };

        let last_url = read(LAST_URL_KEY).filter(|url| !url.is_empty());
        let last_label = read(LAST_LABEL_KEY).unwrap_or_default();

        match last_url {
            Some(url) => NavigationState::new(url, last_label),
            None => NavigationState::new(self.home_url.clone(), last_label),
        }
    }

    /// Persist a navigation (last write wins)
    pub fn save(&self, state: &NavigationState) -> ShellResult<()> {
        self.port.set_all(&[
            (LAST_URL_KEY, state.last_url.as_str()),
            (LAST_LABEL_KEY, state.last_label.as_str()),
        ])?;
        tracing::debug!(url = %state.last_url, label = %state.last_label, "Navigation state saved");
        Ok(())
    }

    /// Drop the persisted navigation so the next load starts at home
    pub fn clear(&self) -> ShellResult<()> {
        self.port.clear(LAST_URL_KEY)?;
        self.port.clear(LAST_LABEL_KEY)?;
        Ok(())
    }

    /// Persisted state without the home fallback
    pub fn peek(&self) -> ShellResult<Option<NavigationState>> {
        let url = self.port.get(LAST_URL_KEY)?;
        let label = self.port.get(LAST_LABEL_KEY)?;
        Ok(url.map(|url| NavigationState::new(url, label.unwrap_or_default())))
    }
}
