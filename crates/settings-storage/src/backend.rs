use settings_types::CanonicalJsonError;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    /// Bytes at an address failed to decode. Internally-written state is
    /// always decodable, so this indicates corruption or a foreign writer
    /// and is fatal to the transaction.
    #[error("malformed state at {address}: {reason}")]
    Malformed { address: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] CanonicalJsonError),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StateError>;

/// The external state tree, reduced to the interface this family needs.
///
/// Reads are point lookups by address; writes only ever land as a whole
/// [`WriteBatch`], which the backend must apply atomically. The
/// surrounding platform serializes transactions touching the same
/// addresses, so implementations need no finer-grained coordination.
pub trait StateBackend {
    fn get(&self, address: &str) -> Result<Option<Vec<u8>>>;

    /// Apply every write in the batch, or none of them.
    fn commit(&self, batch: WriteBatch) -> Result<()>;
}

/// Writes staged by a single transaction.
///
/// Ordered by address so iteration, and therefore commit order, is
/// deterministic across nodes.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: BTreeMap<String, Vec<u8>>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage bytes at an address, replacing any earlier staged write.
    pub fn put(&mut self, address: impl Into<String>, bytes: Vec<u8>) {
        self.writes.insert(address.into(), bytes);
    }

    pub fn get(&self, address: &str) -> Option<&[u8]> {
        self.writes.get(address).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.writes.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_writes(self) -> BTreeMap<String, Vec<u8>> {
        self.writes
    }
}
