//! The collision-tolerant settings container.
//!
//! Addresses are derived by hashing, so two distinct setting names can land
//! on the same physical address. Each address therefore stores an ordered
//! list of `(key, value)` entries rather than a single pair; readers scan
//! the list for their key. Collision counts are tiny, and the explicit
//! ordered list keeps encoding deterministic, which matters more here than
//! lookup speed.

use crate::address::setting_address;
use crate::backend::{Result, StateBackend, StateError, WriteBatch};
use serde::{Deserialize, Serialize};
use settings_types::to_canonical_json;
use tracing::debug;

/// One key/value pair stored at an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

/// Decode the entry list stored at an address.
pub fn decode_settings(bytes: &[u8], address: &str) -> Result<Vec<SettingEntry>> {
    serde_json::from_slice(bytes).map_err(|e| StateError::Malformed {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Encode an entry list. Entry order is preserved, so repeated encodes of
/// the same logical content are byte-identical.
pub fn encode_settings(entries: &[SettingEntry]) -> Result<Vec<u8>> {
    Ok(to_canonical_json(entries)?.into_bytes())
}

/// Replace the entry for `key` if present, else append. The container is
/// never written with duplicate keys.
pub fn upsert_entry(entries: &mut Vec<SettingEntry>, key: &str, value: &str) {
    match entries.iter_mut().find(|e| e.key == key) {
        Some(entry) => entry.value = value.to_string(),
        None => entries.push(SettingEntry {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// A transaction's view of the settings state: reads see the backend
/// overlaid with this transaction's own staged writes, and every mutation
/// is staged into one [`WriteBatch`] so the caller can commit it
/// all-or-nothing.
pub struct SettingsView<'a, S: StateBackend> {
    backend: &'a S,
    batch: WriteBatch,
}

impl<'a, S: StateBackend> SettingsView<'a, S> {
    pub fn new(backend: &'a S) -> Self {
        Self {
            backend,
            batch: WriteBatch::new(),
        }
    }

    fn read(&self, address: &str) -> Result<Option<Vec<u8>>> {
        if let Some(staged) = self.batch.get(address) {
            return Ok(Some(staged.to_vec()));
        }
        self.backend.get(address)
    }

    /// Read the current value of a setting, scanning the entry list at its
    /// derived address.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let address = setting_address(key);
        let Some(bytes) = self.read(&address)? else {
            return Ok(None);
        };
        let entries = decode_settings(&bytes, &address)?;
        Ok(entries
            .into_iter()
            .find(|e| e.key == key)
            .map(|e| e.value))
    }

    /// Upsert a setting. This is the only mutation primitive: it reads the
    /// existing container, replaces-or-appends the entry, and stages the
    /// re-encoded container.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let address = setting_address(key);
        let mut entries = match self.read(&address)? {
            Some(bytes) => decode_settings(&bytes, &address)?,
            None => Vec::new(),
        };
        upsert_entry(&mut entries, key, value);
        debug!(key, address, entries = entries.len(), "staging setting write");
        self.batch.put(address, encode_settings(&entries)?);
        Ok(())
    }

    /// Hand the staged writes to the caller for an atomic commit.
    pub fn into_batch(self) -> WriteBatch {
        self.batch
    }
}
