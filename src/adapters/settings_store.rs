//! In-memory settings store.
//!
//! Implements [`SettingsPort`] by keeping the settings record as one
//! opaque JSON blob under a single key, the way a browser keeps it in
//! local storage.  Values are validated before they are written.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{info, warn};

use crate::app::ports::{SettingsError, SettingsPort};
use crate::config::PanelSettings;

const SETTINGS_NAMESPACE: &str = "rcpanel";
const SETTINGS_KEY: &str = "settings";

/// Upper bound on a stored blob.
pub const MAX_BLOB_SIZE: usize = 4096;

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        info!("MemorySettingsStore: in-memory backend");
        Self::default()
    }

    /// Store starting with a raw blob already present (e.g. read from
    /// a file).  The blob is not checked until [`load`](SettingsPort::load).
    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        let s = Self::new();
        s.store
            .borrow_mut()
            .insert(composite_key(SETTINGS_NAMESPACE, SETTINGS_KEY), blob.into());
        s
    }

    /// Raw stored blob, if any.
    pub fn blob(&self) -> Option<Vec<u8>> {
        self.store
            .borrow()
            .get(&composite_key(SETTINGS_NAMESPACE, SETTINGS_KEY))
            .cloned()
    }

    pub fn clear(&self) {
        self.store.borrow_mut().clear();
    }
}

fn composite_key(namespace: &str, key: &str) -> String {
    format!("{}::{}", namespace, key)
}

/// Decode a settings blob.  Missing fields take their defaults.
pub fn decode_blob(bytes: &[u8]) -> Result<PanelSettings, SettingsError> {
    if bytes.len() > MAX_BLOB_SIZE {
        return Err(SettingsError::Corrupted);
    }
    serde_json::from_slice(bytes).map_err(|_| SettingsError::Corrupted)
}

impl SettingsPort for MemorySettingsStore {
    fn load(&self) -> Result<PanelSettings, SettingsError> {
        let key = composite_key(SETTINGS_NAMESPACE, SETTINGS_KEY);
        match self.store.borrow().get(&key) {
            Some(bytes) => {
                let settings = decode_blob(bytes).inspect_err(|_| {
                    warn!("MemorySettingsStore: stored settings failed to decode");
                })?;
                info!("MemorySettingsStore: loaded settings");
                Ok(settings)
            }
            None => {
                info!("MemorySettingsStore: nothing stored, using defaults");
                Ok(PanelSettings::default())
            }
        }
    }

    fn save(&self, settings: &PanelSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        let bytes = serde_json::to_vec(settings).map_err(|_| SettingsError::IoError)?;
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(SettingsError::IoError);
        }
        self.store
            .borrow_mut()
            .insert(composite_key(SETTINGS_NAMESPACE, SETTINGS_KEY), bytes);
        info!("MemorySettingsStore: settings saved");
        Ok(())
    }
}
