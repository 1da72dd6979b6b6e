//! Wire payload consumed by the governance state machine.
//!
//! A tagged union of the two actions the family understands. The encoding
//! is canonical JSON; the original deployment of this family used a fixed
//! protobuf schema, so these payloads are deterministic but not
//! wire-compatible with it.

use crate::canonical::{canonical_hash, to_canonical_json, CanonicalJsonError};
use crate::keys::PublicKey;
use serde::{Deserialize, Serialize};

/// A proposed change to one setting.
///
/// The nonce lets logically identical proposals coexist as distinct
/// records: it feeds the derived proposal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingProposal {
    pub setting: String,
    pub value: String,
    pub nonce: String,
}

/// A ballot cast on an open proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingVote {
    pub proposal_id: String,
    pub vote: VoteChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    Accept,
    Reject,
}

/// The payload of one settings transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum SettingsPayload {
    Propose(SettingProposal),
    Vote(SettingVote),
}

impl SettingsPayload {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CanonicalJsonError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CanonicalJsonError> {
        Ok(to_canonical_json(self)?.into_bytes())
    }
}

impl SettingProposal {
    /// Content-addressed proposal identity.
    ///
    /// Hashes the full proposal content plus the proposer, so a replay of
    /// the same proposal by a different signer yields a different id.
    pub fn proposal_id(&self, proposer: &PublicKey) -> Result<String, CanonicalJsonError> {
        #[derive(Serialize)]
        struct IdContent<'a> {
            setting: &'a str,
            value: &'a str,
            nonce: &'a str,
            proposer: &'a str,
        }

        let hash = canonical_hash(&IdContent {
            setting: &self.setting,
            value: &self.value,
            nonce: &self.nonce,
            proposer: proposer.as_str(),
        })?;
        Ok(hex::encode(hash))
    }
}
