//! Shared types for the on-chain settings transaction family.
//!
//! Everything here is a leaf: plain data types plus the canonical
//! serialization that keeps encodings byte-identical across nodes.

pub mod canonical;
pub mod keys;
pub mod payload;

pub use canonical::{canonical_hash, to_canonical_json, CanonicalJsonError};
pub use keys::PublicKey;
pub use payload::{SettingProposal, SettingVote, SettingsPayload, VoteChoice};

/// Transaction family identifier, fixed by the deployed header contract.
pub const FAMILY_NAME: &str = "sawtooth_config";

/// Transaction family version.
pub const FAMILY_VERSION: &str = "1.0";
