use serde::{Deserialize, Serialize};
use std::fmt;

/// A signer's public key, carried as the hex string the surrounding
/// platform validated before the core runs. The core never verifies
/// signatures; it only compares identities.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(String);

impl PublicKey {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PublicKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = self.0.get(..8).unwrap_or(&self.0);
        write!(f, "PublicKey({}...)", head)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_identity() {
        let a = PublicKey::new("02aabbcc");
        let b = PublicKey::from("02aabbcc");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "02aabbcc");
    }

    #[test]
    fn test_debug_truncates() {
        let pk = PublicKey::new("02aabbccddeeff00112233");
        assert_eq!(format!("{:?}", pk), "PublicKey(02aabbcc...)");
    }
}
