//! Fuzz target: settings blob decoding
//!
//! Feeds arbitrary bytes to the settings store.  Loading must either
//! yield a record or `Corrupted`, and a record that validates and
//! fits must survive a save/load cycle unchanged.
//!
//! cargo fuzz run fuzz_settings_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use rcpanel::adapters::settings_store::MemorySettingsStore;
use rcpanel::app::ports::{SettingsError, SettingsPort};

fuzz_target!(|data: &[u8]| {
    let store = MemorySettingsStore::with_blob(data.to_vec());
    match store.load() {
        Ok(settings) => {
            if settings.validate().is_ok() {
                let fresh = MemorySettingsStore::new();
                // Filling in missing fields can push a record past the blob limit.
                match fresh.save(&settings) {
                    Ok(()) => {
                        assert_eq!(fresh.load().expect("saved settings must load"), settings);
                    }
                    Err(e) => assert_eq!(e, SettingsError::IoError),
                }
            }
        }
        Err(e) => assert_eq!(e, SettingsError::Corrupted),
    }
});
