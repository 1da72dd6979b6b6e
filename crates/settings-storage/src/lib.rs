//! State-store seam and codecs for the on-chain settings registry.
//!
//! The settings themselves live in an external Merkle-style state tree;
//! this crate owns everything between that tree's address→bytes interface
//! and the typed settings the governance machine works with:
//!
//! - [`address`]: name → fixed-length storage address
//! - [`container`]: the collision-tolerant per-address entry list, and
//!   [`SettingsView`], the read-through/staged-write view a transaction
//!   mutates
//! - [`candidates`]: the base64-layered encoding of the open ballot list
//! - [`backend`]: the [`StateBackend`] trait plus [`WriteBatch`], the
//!   all-or-nothing commit unit
//! - [`memory`]: an in-memory backend for tests and development

pub mod address;
pub mod backend;
pub mod candidates;
pub mod container;
pub mod memory;

pub use address::setting_address;
pub use backend::{StateBackend, StateError, WriteBatch};
pub use candidates::{SettingCandidate, VoteRecord, PROPOSALS_SETTING};
pub use container::{SettingEntry, SettingsView};
pub use memory::MemoryBackend;
