// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical content hash for node configuration (`spec.md` §4.6).
//!
//! `serde_json::Map` is `BTreeMap`-backed unless the `preserve_order`
//! feature is enabled (it isn't here), so round-tripping through it is
//! exactly the "re-serialize with sorted keys" step the spec asks for.

use crate::error::ConfigError;
use sha2::{Digest, Sha256};

/// Parse `yaml`, re-serialize it with sorted keys, and hash the result,
/// truncated to 16 hex characters (`spec.md` §4.6: "Property:
/// semantically equal configs → identical hash").
pub fn canonical_hash(yaml: &str) -> Result<String, ConfigError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let json_value = serde_json::to_value(&value).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let canonical =
        serde_json::to_vec(&json_value).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest = hasher.finalize();
    Ok(hex::encode(digest)[..16].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantically_equal_configs_hash_identically() {
        let a = "paths:\n  cam1: {}\n  cam2: {source: rtsp://x}\n";
        let b = "paths:\n  cam2: {source: rtsp://x}\n  cam1: {}\n";
        assert_eq!(canonical_hash(a).unwrap(), canonical_hash(b).unwrap());
    }

    #[test]
    fn different_content_hashes_differently() {
        let a = "paths:\n  cam1: {}\n";
        let b = "paths:\n  cam1: {source: rtsp://y}\n";
        assert_ne!(canonical_hash(a).unwrap(), canonical_hash(b).unwrap());
    }

    #[test]
    fn hash_is_sixteen_hex_chars() {
        let hash = canonical_hash("paths: {}\n").unwrap();
        assert_eq!(hash.len(), 16);
    }
}
