//! Authorization policy: which scheme is active, and who may act under it.
//!
//! The scheme is itself configured through ordinary settings, so in Ballot
//! mode it can only be changed through the same proposal/vote pipeline it
//! governs. The very first configuration is written by an out-of-band
//! genesis mechanism, not through this pipeline.

use crate::error::{GovernanceError, Result};
use settings_storage::{SettingsView, StateBackend};
use settings_types::PublicKey;

pub const AUTHORIZATION_TYPE_SETTING: &str = "sawtooth.config.authorization_type";
pub const AUTHORIZED_KEYS_SETTING: &str = "sawtooth.config.vote.authorized_keys";
pub const APPROVAL_THRESHOLD_SETTING: &str = "sawtooth.config.vote.approval_threshold";

/// Threshold used when `approval_threshold` is unset in Ballot mode:
/// every authorized key must accept.
const DEFAULT_APPROVAL_THRESHOLD: u32 = 100;

/// The active authorization scheme, as a tagged variant so alternative
/// schemes can slot in beside these without touching the addressing or
/// encoding contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationMode {
    /// Any signer may apply any change immediately, with no voting.
    /// Insecure for production; intended for tests and development nets.
    None,
    /// Only the listed keys may propose or vote; a proposal commits once
    /// `approval_threshold` percent of them accept. A single-entry key
    /// list is the degenerate single-authority case of the same scheme.
    Ballot {
        authorized_keys: Vec<String>,
        approval_threshold: u32,
    },
}

impl AuthorizationMode {
    /// Read the active mode from current on-chain settings.
    pub fn from_state<S: StateBackend>(view: &SettingsView<'_, S>) -> Result<Self> {
        let auth_type = view
            .get(AUTHORIZATION_TYPE_SETTING)?
            .unwrap_or_else(|| "None".to_string());

        match auth_type.as_str() {
            "None" => Ok(AuthorizationMode::None),
            "Ballot" => {
                let authorized_keys = view
                    .get(AUTHORIZED_KEYS_SETTING)?
                    .map(|keys| parse_authorized_keys(&keys))
                    .unwrap_or_default();
                if authorized_keys.is_empty() {
                    return Err(GovernanceError::InvalidConfiguration(
                        "ballot mode requires a non-empty authorized key list".to_string(),
                    ));
                }

                let approval_threshold = match view.get(APPROVAL_THRESHOLD_SETTING)? {
                    Some(raw) => parse_threshold(&raw)?,
                    None => DEFAULT_APPROVAL_THRESHOLD,
                };

                Ok(AuthorizationMode::Ballot {
                    authorized_keys,
                    approval_threshold,
                })
            }
            other => Err(GovernanceError::InvalidConfiguration(format!(
                "unrecognized authorization type: {other}"
            ))),
        }
    }

    /// Check that `signer` may perform `action` (propose or vote) under
    /// this mode.
    pub fn check_signer(&self, signer: &PublicKey, action: &'static str) -> Result<()> {
        match self {
            AuthorizationMode::None => Ok(()),
            AuthorizationMode::Ballot {
                authorized_keys, ..
            } => {
                if authorized_keys.iter().any(|k| k == signer.as_str()) {
                    Ok(())
                } else {
                    Err(GovernanceError::Unauthorized {
                        signer: signer.to_string(),
                        action,
                    })
                }
            }
        }
    }
}

/// Authorized keys are stored as one comma-separated setting value.
fn parse_authorized_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_threshold(raw: &str) -> Result<u32> {
    let threshold: u32 = raw.trim().parse().map_err(|_| {
        GovernanceError::InvalidConfiguration(format!(
            "approval threshold must be an integer, got {raw:?}"
        ))
    })?;
    if !(1..=100).contains(&threshold) {
        return Err(GovernanceError::InvalidConfiguration(format!(
            "approval threshold must be in 1..=100, got {threshold}"
        )));
    }
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings_storage::MemoryBackend;

    fn backend_with(settings: &[(&str, &str)]) -> MemoryBackend {
        let backend = MemoryBackend::new();
        let mut view = SettingsView::new(&backend);
        for (key, value) in settings {
            view.set(key, value).unwrap();
        }
        backend.commit(view.into_batch()).unwrap();
        backend
    }

    #[test]
    fn test_absent_type_is_none_mode() {
        let backend = MemoryBackend::new();
        let view = SettingsView::new(&backend);
        let mode = AuthorizationMode::from_state(&view).unwrap();
        assert_eq!(mode, AuthorizationMode::None);
    }

    #[test]
    fn test_ballot_mode_parsed() {
        let backend = backend_with(&[
            (AUTHORIZATION_TYPE_SETTING, "Ballot"),
            (AUTHORIZED_KEYS_SETTING, "02aa,02bb, 02cc"),
            (APPROVAL_THRESHOLD_SETTING, "60"),
        ]);
        let view = SettingsView::new(&backend);

        let mode = AuthorizationMode::from_state(&view).unwrap();
        assert_eq!(
            mode,
            AuthorizationMode::Ballot {
                authorized_keys: vec![
                    "02aa".to_string(),
                    "02bb".to_string(),
                    "02cc".to_string()
                ],
                approval_threshold: 60,
            }
        );
    }

    #[test]
    fn test_ballot_mode_threshold_defaults_to_unanimous() {
        let backend = backend_with(&[
            (AUTHORIZATION_TYPE_SETTING, "Ballot"),
            (AUTHORIZED_KEYS_SETTING, "02aa"),
        ]);
        let view = SettingsView::new(&backend);

        match AuthorizationMode::from_state(&view).unwrap() {
            AuthorizationMode::Ballot {
                approval_threshold, ..
            } => assert_eq!(approval_threshold, 100),
            other => panic!("expected ballot mode, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_type_rejected() {
        let backend = backend_with(&[(AUTHORIZATION_TYPE_SETTING, "Oligarchy")]);
        let view = SettingsView::new(&backend);

        let err = AuthorizationMode::from_state(&view).unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_ballot_mode_requires_keys() {
        let backend = backend_with(&[(AUTHORIZATION_TYPE_SETTING, "Ballot")]);
        let view = SettingsView::new(&backend);

        let err = AuthorizationMode::from_state(&view).unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_threshold_bounds() {
        for bad in ["0", "101", "abc", "-5", "60.5"] {
            let backend = backend_with(&[
                (AUTHORIZATION_TYPE_SETTING, "Ballot"),
                (AUTHORIZED_KEYS_SETTING, "02aa"),
                (APPROVAL_THRESHOLD_SETTING, bad),
            ]);
            let view = SettingsView::new(&backend);
            assert!(
                AuthorizationMode::from_state(&view).is_err(),
                "threshold {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_check_signer() {
        let mode = AuthorizationMode::Ballot {
            authorized_keys: vec!["02aa".to_string()],
            approval_threshold: 100,
        };

        assert!(mode.check_signer(&PublicKey::new("02aa"), "propose").is_ok());
        let err = mode
            .check_signer(&PublicKey::new("02zz"), "propose")
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Unauthorized { .. }));

        assert!(AuthorizationMode::None
            .check_signer(&PublicKey::new("anyone"), "propose")
            .is_ok());
    }
}
