// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structural validation of node configuration YAML (`spec.md` §4.6).

use crate::hash::canonical_hash;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub hash: String,
}

/// Validate `yaml` per `spec.md` §4.6: a top-level `paths` mapping is
/// required; each path entry must be empty or a mapping whose `source`
/// and `runOnReady`, if present, are strings. `readTimeout`/`writeTimeout`
/// below 5 are warnings, not errors.
pub fn validate(yaml: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let parsed: Value = match serde_yaml::from_str(yaml) {
        Ok(v) => v,
        Err(e) => {
            return ValidationResult {
                valid: false,
                errors: vec![format!("yaml parse error: {e}")],
                warnings,
                hash: String::new(),
            };
        }
    };

    let root = parsed.as_mapping();
    let paths = root.and_then(|m| m.get(Value::String("paths".to_string())));
    match paths {
        None => errors.push("missing required top-level key: paths".to_string()),
        Some(Value::Mapping(paths_map)) => {
            for (key, entry) in paths_map {
                let name = key.as_str().unwrap_or("<non-string key>");
                match entry {
                    Value::Null => {}
                    Value::Mapping(fields) => {
                        if let Some(source) = fields.get(Value::String("source".to_string())) {
                            if !source.is_string() {
                                errors.push(format!("paths.{name}.source must be a string"));
                            }
                        }
                        if let Some(run_on_ready) =
                            fields.get(Value::String("runOnReady".to_string()))
                        {
                            if !run_on_ready.is_string() {
                                errors.push(format!("paths.{name}.runOnReady must be a string"));
                            }
                        }
                    }
                    _ => errors.push(format!("paths.{name} must be empty or a mapping")),
                }
            }
        }
        Some(_) => errors.push("paths must be a mapping".to_string()),
    }

    if let Some(root) = root {
        for key in ["readTimeout", "writeTimeout"] {
            if let Some(value) = root.get(Value::String(key.to_string())) {
                if value.as_i64().is_some_and(|v| v < 5) {
                    warnings.push(format!("{key} below 5 may cause connection churn"));
                }
            }
        }
    }

    let hash = canonical_hash(yaml).unwrap_or_default();
    ValidationResult { valid: errors.is_empty(), errors, warnings, hash }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_paths_is_invalid() {
        let result = validate("foo: bar\n");
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("paths")));
    }

    #[test]
    fn empty_path_entry_is_valid() {
        let result = validate("paths:\n  cam1:\n");
        assert!(result.valid);
    }

    #[test]
    fn non_string_source_is_invalid() {
        let result = validate("paths:\n  cam1:\n    source: 123\n");
        assert!(!result.valid);
    }

    #[test]
    fn low_timeout_is_a_warning_not_an_error() {
        let result = validate("paths: {}\nreadTimeout: 2\n");
        assert!(result.valid);
        assert!(!result.warnings.is_empty());
    }
}
