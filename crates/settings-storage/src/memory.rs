use crate::backend::{Result, StateBackend, StateError, WriteBatch};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory state backend for tests and development.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateBackend for MemoryBackend {
    fn get(&self, address: &str) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StateError::Backend("state lock poisoned".to_string()))?;
        Ok(entries.get(address).cloned())
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        // One write lock for the whole batch keeps the commit atomic with
        // respect to concurrent readers.
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StateError::Backend("state lock poisoned".to_string()))?;
        for (address, bytes) in batch.into_writes() {
            entries.insert(address, bytes);
        }
        Ok(())
    }
}
