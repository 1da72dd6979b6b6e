//! Governance state machine for the on-chain settings registry.
//!
//! Processes PROPOSE and VOTE payloads against the current state snapshot:
//! authorization-mode enforcement, ballot bookkeeping, threshold
//! resolution, and the resulting atomic batch of setting writes.

pub mod error;
pub mod machine;
pub mod policy;

pub use error::{GovernanceError, Result};
pub use machine::{
    evaluate_ballot, BallotOutcome, SettingsTransactionHandler, MAX_SETTING_KEY_LEN,
    MAX_SETTING_VALUE_LEN,
};
pub use policy::{
    AuthorizationMode, APPROVAL_THRESHOLD_SETTING, AUTHORIZATION_TYPE_SETTING,
    AUTHORIZED_KEYS_SETTING,
};
