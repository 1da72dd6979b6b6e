//! The governance state machine.
//!
//! `apply` turns one validated transaction (payload + signer) plus the
//! current state snapshot into a single all-or-nothing batch of state
//! writes, or a rejection that leaves state untouched. Determinism is the
//! governing constraint: no clock, no randomness, no unordered iteration
//! anywhere in the vote arithmetic or candidate bookkeeping, so every
//! honest node computes bit-identical writes from the same transaction
//! sequence.

use crate::error::{GovernanceError, Result};
use crate::policy::AuthorizationMode;
use settings_storage::candidates::{decode_candidates, encode_candidates};
use settings_storage::{
    SettingCandidate, SettingsView, StateBackend, StateError, VoteRecord, PROPOSALS_SETTING,
};
use settings_types::{PublicKey, SettingProposal, SettingVote, SettingsPayload, VoteChoice};
use tracing::{debug, info};

/// Deployment parameter: longest accepted setting key.
pub const MAX_SETTING_KEY_LEN: usize = 256;

/// Deployment parameter: longest accepted setting value.
pub const MAX_SETTING_VALUE_LEN: usize = 4096;

/// Where a candidate's ballot stands after a tally. `Pending` candidates
/// stay in the list collecting votes; `Accepted` and `Rejected` are
/// terminal, and the candidate is removed so its id can never mutate state
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallotOutcome {
    Pending,
    Accepted,
    Rejected,
}

/// Threshold arithmetic over one candidate's recorded votes.
///
/// Integer percentage semantics; ties resolve in favor of acceptance at
/// exactly the threshold. A candidate is rejected as soon as acceptance
/// becomes mathematically unreachable even if every remaining authorized
/// key were to vote Accept.
pub fn evaluate_ballot(
    votes: &[VoteRecord],
    total_authorized: usize,
    approval_threshold: u32,
) -> BallotOutcome {
    let accept_count = votes
        .iter()
        .filter(|v| v.vote == VoteChoice::Accept)
        .count();
    let reject_count = votes.len() - accept_count;
    let threshold = approval_threshold as usize;

    if accept_count * 100 >= threshold * total_authorized {
        BallotOutcome::Accepted
    } else if reject_count * 100 > (100 - threshold) * total_authorized {
        BallotOutcome::Rejected
    } else {
        BallotOutcome::Pending
    }
}

/// Transaction handler for the settings family.
#[derive(Debug, Default)]
pub struct SettingsTransactionHandler;

impl SettingsTransactionHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process one transaction against current state.
    ///
    /// Every write this call computes is staged into one batch and
    /// committed at the end; any error returns before the commit, so a
    /// rejected transaction leaves no trace in state.
    pub fn apply<S: StateBackend>(
        &self,
        payload: &SettingsPayload,
        signer: &PublicKey,
        state: &S,
    ) -> Result<()> {
        let mut view = SettingsView::new(state);

        match payload {
            SettingsPayload::Propose(proposal) => {
                self.apply_proposal(&mut view, proposal, signer)?
            }
            SettingsPayload::Vote(vote) => self.apply_vote(&mut view, vote, signer)?,
        }

        state.commit(view.into_batch())?;
        Ok(())
    }

    fn apply_proposal<S: StateBackend>(
        &self,
        view: &mut SettingsView<'_, S>,
        proposal: &SettingProposal,
        signer: &PublicKey,
    ) -> Result<()> {
        let mode = AuthorizationMode::from_state(view)?;
        mode.check_signer(signer, "propose")?;
        validate_proposal(proposal)?;

        let proposal_id = proposal.proposal_id(signer).map_err(StateError::from)?;

        match mode {
            AuthorizationMode::None => {
                // No voting: the proposed value is applied in this same
                // transaction, and no candidate is ever persisted.
                view.set(&proposal.setting, &proposal.value)?;
                info!(
                    setting = %proposal.setting,
                    value = %proposal.value,
                    signer = %signer,
                    "setting applied directly (authorization disabled)"
                );
                Ok(())
            }
            AuthorizationMode::Ballot {
                authorized_keys,
                approval_threshold,
            } => {
                let mut candidates =
                    decode_candidates(view.get(PROPOSALS_SETTING)?.as_deref())?;

                // The nonce already distinguishes legitimately distinct
                // proposals, so a colliding id is a replay: reject rather
                // than reset the existing ballot.
                if candidates.iter().any(|c| c.proposal_id == proposal_id) {
                    return Err(GovernanceError::DuplicateProposal(proposal_id));
                }

                candidates.push(SettingCandidate {
                    proposal_id: proposal_id.clone(),
                    proposal: proposal.clone(),
                    votes: Vec::new(),
                });
                info!(
                    proposal_id = %proposal_id,
                    setting = %proposal.setting,
                    signer = %signer,
                    "📋 proposal entered the ballot"
                );

                // Run the identical resolution check the vote path runs,
                // so the propose and propose+vote paths cannot diverge.
                let index = candidates.len() - 1;
                self.resolve_and_store(view, candidates, index, &authorized_keys, approval_threshold)
            }
        }
    }

    fn apply_vote<S: StateBackend>(
        &self,
        view: &mut SettingsView<'_, S>,
        vote: &SettingVote,
        signer: &PublicKey,
    ) -> Result<()> {
        let mode = AuthorizationMode::from_state(view)?;
        mode.check_signer(signer, "vote")?;

        let AuthorizationMode::Ballot {
            authorized_keys,
            approval_threshold,
        } = mode
        else {
            // No candidates can exist outside ballot mode.
            return Err(GovernanceError::UnknownProposal(vote.proposal_id.clone()));
        };

        let mut candidates = decode_candidates(view.get(PROPOSALS_SETTING)?.as_deref())?;
        let index = candidates
            .iter()
            .position(|c| c.proposal_id == vote.proposal_id)
            .ok_or_else(|| GovernanceError::UnknownProposal(vote.proposal_id.clone()))?;

        let candidate = &mut candidates[index];
        if candidate
            .votes
            .iter()
            .any(|v| v.public_key == signer.as_str())
        {
            return Err(GovernanceError::DuplicateVote {
                public_key: signer.to_string(),
                proposal_id: vote.proposal_id.clone(),
            });
        }

        candidate.votes.push(VoteRecord {
            public_key: signer.to_string(),
            vote: vote.vote,
        });
        debug!(
            proposal_id = %vote.proposal_id,
            signer = %signer,
            choice = ?vote.vote,
            votes = candidate.votes.len(),
            "vote recorded"
        );

        self.resolve_and_store(view, candidates, index, &authorized_keys, approval_threshold)
    }

    /// Tally the candidate at `index`, apply its terminal effect if it
    /// resolved, and stage the updated candidates list. In-flight
    /// candidates are always evaluated against the key set current at this
    /// vote; they are not grandfathered under the set that existed when
    /// they were proposed.
    fn resolve_and_store<S: StateBackend>(
        &self,
        view: &mut SettingsView<'_, S>,
        mut candidates: Vec<SettingCandidate>,
        index: usize,
        authorized_keys: &[String],
        approval_threshold: u32,
    ) -> Result<()> {
        match evaluate_ballot(
            &candidates[index].votes,
            authorized_keys.len(),
            approval_threshold,
        ) {
            BallotOutcome::Accepted => {
                let candidate = candidates.remove(index);
                view.set(&candidate.proposal.setting, &candidate.proposal.value)?;
                info!(
                    proposal_id = %candidate.proposal_id,
                    setting = %candidate.proposal.setting,
                    value = %candidate.proposal.value,
                    "✅ ballot accepted, setting applied"
                );
            }
            BallotOutcome::Rejected => {
                let candidate = candidates.remove(index);
                info!(
                    proposal_id = %candidate.proposal_id,
                    setting = %candidate.proposal.setting,
                    "ballot rejected, candidate discarded"
                );
            }
            BallotOutcome::Pending => {
                debug!(
                    proposal_id = %candidates[index].proposal_id,
                    "ballot still pending"
                );
            }
        }

        let encoded = encode_candidates(&candidates)?;
        view.set(PROPOSALS_SETTING, &encoded)?;
        Ok(())
    }
}

fn validate_proposal(proposal: &SettingProposal) -> Result<()> {
    if proposal.setting == PROPOSALS_SETTING {
        return Err(GovernanceError::InvalidProposal(format!(
            "{PROPOSALS_SETTING} cannot itself be the target of a proposal"
        )));
    }
    if proposal.setting.is_empty() {
        return Err(GovernanceError::InvalidProposal(
            "setting key must be non-empty".to_string(),
        ));
    }
    if proposal.setting.len() > MAX_SETTING_KEY_LEN {
        return Err(GovernanceError::InvalidProposal(format!(
            "setting key exceeds {MAX_SETTING_KEY_LEN} bytes"
        )));
    }
    if proposal.value.len() > MAX_SETTING_VALUE_LEN {
        return Err(GovernanceError::InvalidProposal(format!(
            "setting value exceeds {MAX_SETTING_VALUE_LEN} bytes"
        )));
    }
    Ok(())
}
