use settings_storage::StateError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GovernanceError>;

/// Every variant rejects the whole transaction atomically; the core never
/// retries, and never partially applies a proposal or vote.
#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("signer {signer} is not authorized to {action}")]
    Unauthorized { signer: String, action: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("duplicate proposal: {0}")]
    DuplicateProposal(String),

    #[error("unknown proposal: {0}")]
    UnknownProposal(String),

    #[error("duplicate vote from {public_key} on proposal {proposal_id}")]
    DuplicateVote {
        public_key: String,
        proposal_id: String,
    },

    /// Codec failure reading existing state: corruption, never recovered.
    #[error(transparent)]
    MalformedState(#[from] StateError),
}
