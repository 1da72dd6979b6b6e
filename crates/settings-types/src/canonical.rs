//! Canonical JSON serialization.
//!
//! Every on-chain encoding in this workspace goes through this module, so
//! that logically identical values always serialize to identical bytes:
//!
//! 1. Object keys sorted lexicographically (UTF-8 byte order)
//! 2. Compact output, no whitespace
//! 3. Null-valued fields omitted
//!
//! Byte-identical encodings are what keep state roots identical across
//! nodes; any drift here is a consensus fault, not a cosmetic bug.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanonicalJsonError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CanonicalJsonError>;

/// Serialize a value to its canonical JSON string.
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json_value = serde_json::to_value(value)?;
    let canonical = canonicalize_value(json_value);
    Ok(serde_json::to_string(&canonical)?)
}

/// Deterministic content hash: Blake3 over the canonical JSON bytes.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<[u8; 32]> {
    let canonical = to_canonical_json(value)?;
    Ok(*blake3::hash(canonical.as_bytes()).as_bytes())
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, canonicalize_value(v)))
                .collect();

            // Map preserves insertion order, which is now sorted
            let mut canonical_map = Map::new();
            for (k, v) in sorted {
                canonical_map.insert(k, v);
            }
            Value::Object(canonical_map)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Record {
        setting: String,
        value: String,
        nonce: u64,
    }

    #[test]
    fn test_key_ordering() {
        let record = Record {
            setting: "a.b.c".to_string(),
            value: "10".to_string(),
            nonce: 7,
        };

        let json = to_canonical_json(&record).unwrap();
        assert_eq!(json, r#"{"nonce":7,"setting":"a.b.c","value":"10"}"#);
    }

    #[test]
    fn test_no_whitespace() {
        let record = Record {
            setting: "x".to_string(),
            value: "y".to_string(),
            nonce: 0,
        };

        let json = to_canonical_json(&record).unwrap();
        assert!(!json.contains(' '));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_null_values_omitted() {
        let value = serde_json::json!({
            "present": "value",
            "missing": null,
        });

        let canonical = to_canonical_json(&value).unwrap();
        assert_eq!(canonical, r#"{"present":"value"}"#);
    }

    #[test]
    fn test_nested_keys_sorted() {
        let value = serde_json::json!({
            "z": { "b": 2, "a": 1 },
            "a": "first",
        });

        let canonical = to_canonical_json(&value).unwrap();
        assert_eq!(canonical, r#"{"a":"first","z":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_deterministic_hash() {
        let a = Record {
            setting: "k".to_string(),
            value: "v".to_string(),
            nonce: 42,
        };
        let b = Record {
            setting: "k".to_string(),
            value: "v".to_string(),
            nonce: 42,
        };

        assert_eq!(canonical_hash(&a).unwrap(), canonical_hash(&b).unwrap());
    }

    #[test]
    fn test_different_content_different_hash() {
        let a = Record {
            setting: "k".to_string(),
            value: "v".to_string(),
            nonce: 1,
        };
        let b = Record {
            setting: "k".to_string(),
            value: "v".to_string(),
            nonce: 2,
        };

        assert_ne!(canonical_hash(&a).unwrap(), canonical_hash(&b).unwrap());
    }
}
