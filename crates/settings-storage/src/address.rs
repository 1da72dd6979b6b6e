//! Storage addressing for the settings namespace.
//!
//! `address = "000000" + hex(sha256(setting_name))`. Pure and total, and
//! frozen forever: consensus modules hardcode the derived addresses of
//! well-known settings, so changing this function is a network-wide break.

use sha2::{Digest, Sha256};

/// Reserved namespace prefix for this transaction family.
pub const NAMESPACE: &str = "000000";

/// Derive the fixed-length storage address of a setting name.
pub fn setting_address(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    format!("{NAMESPACE}{}", hex::encode(digest))
}
