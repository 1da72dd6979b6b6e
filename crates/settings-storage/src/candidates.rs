//! Codec for the open-ballot list.
//!
//! The candidates live under one well-known setting, layered as:
//! settings container → entry → base64 string → candidates list. The two
//! layers are independent codecs on purpose; this module only knows about
//! the inner one (base64 string ↔ candidates list) and leaves the
//! container to [`crate::container`].

use crate::backend::{Result, StateError};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use settings_types::{to_canonical_json, SettingProposal, VoteChoice};

/// The setting whose value holds the candidates list. Never itself a
/// PROPOSE or VOTE target.
pub const PROPOSALS_SETTING: &str = "sawtooth.config.vote.proposals";

/// One recorded ballot on a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub public_key: String,
    pub vote: VoteChoice,
}

/// A proposed setting change collecting votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingCandidate {
    pub proposal_id: String,
    pub proposal: SettingProposal,
    pub votes: Vec<VoteRecord>,
}

/// Decode the candidates list from the stored setting value. An absent
/// setting means no ballots are open.
pub fn decode_candidates(value: Option<&str>) -> Result<Vec<SettingCandidate>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let bytes = general_purpose::STANDARD
        .decode(value)
        .map_err(|e| malformed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| malformed(e.to_string()))
}

/// Encode the candidates list to the string form stored as the setting
/// value. Candidate and vote order are preserved, so the encoding is
/// deterministic.
pub fn encode_candidates(candidates: &[SettingCandidate]) -> Result<String> {
    let json = to_canonical_json(&candidates)?;
    Ok(general_purpose::STANDARD.encode(json.as_bytes()))
}

fn malformed(reason: String) -> StateError {
    StateError::Malformed {
        address: crate::address::setting_address(PROPOSALS_SETTING),
        reason,
    }
}
