// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config diff: a text diff of sorted-key renderings plus a structural
//! change list from a recursive key walk (`spec.md` §4.6).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub path: String,
    pub old: Option<serde_json::Value>,
    pub new: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDiff {
    pub text: String,
    pub structural: Vec<StructuralChange>,
}

/// Re-serialize `yaml` with sorted keys, for use as diff input.
fn sorted_render(yaml: &str) -> Result<String, ConfigError> {
    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let json = serde_json::to_value(&value).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    serde_json::to_string_pretty(&json).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Minimal line-based diff (longest-common-subsequence), unified-style:
/// `" "` unchanged, `"-"` removed, `"+"` added.
fn text_diff(old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let n = old_lines.len();
    let m = new_lines.len();

    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old_lines[i] == new_lines[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old_lines[i] == new_lines[j] {
            out.push(format!("  {}", old_lines[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push(format!("- {}", old_lines[i]));
            i += 1;
        } else {
            out.push(format!("+ {}", new_lines[j]));
            j += 1;
        }
    }
    while i < n {
        out.push(format!("- {}", old_lines[i]));
        i += 1;
    }
    while j < m {
        out.push(format!("+ {}", new_lines[j]));
        j += 1;
    }
    out.join("\n")
}

/// Recursive key walk producing a flat list of structural changes with
/// dotted paths (`spec.md` §4.6).
fn structural_diff(old: &Value, new: &Value, prefix: &str, out: &mut Vec<StructuralChange>) {
    match (old, new) {
        (Value::Mapping(old_map), Value::Mapping(new_map)) => {
            for (key, old_value) in old_map {
                let Some(key_str) = key.as_str() else { continue };
                let path = dotted(prefix, key_str);
                match new_map.get(key) {
                    None => out.push(StructuralChange {
                        change_type: ChangeType::Removed,
                        path,
                        old: to_json(old_value),
                        new: None,
                    }),
                    Some(new_value) => structural_diff(old_value, new_value, &path, out),
                }
            }
            for (key, new_value) in new_map {
                let Some(key_str) = key.as_str() else { continue };
                if !old_map.contains_key(key) {
                    out.push(StructuralChange {
                        change_type: ChangeType::Added,
                        path: dotted(prefix, key_str),
                        old: None,
                        new: to_json(new_value),
                    });
                }
            }
        }
        _ if old != new => out.push(StructuralChange {
            change_type: ChangeType::Modified,
            path: prefix.to_string(),
            old: to_json(old),
            new: to_json(new),
        }),
        _ => {}
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn to_json(value: &Value) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

/// Diff two configs: a text diff of their sorted-key renderings plus the
/// structural change list.
pub fn diff(old_yaml: &str, new_yaml: &str) -> Result<ConfigDiff, ConfigError> {
    let old_rendered = sorted_render(old_yaml)?;
    let new_rendered = sorted_render(new_yaml)?;
    let text = text_diff(&old_rendered, &new_rendered);

    let old_value: Value =
        serde_yaml::from_str(old_yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let new_value: Value =
        serde_yaml::from_str(new_yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let mut structural = Vec::new();
    structural_diff(&old_value, &new_value, "", &mut structural);

    Ok(ConfigDiff { text, structural })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_added_removed_modified_keys() {
        let old = "paths:\n  a:\n    source: old\n  b: {}\n";
        let new = "paths:\n  a:\n    source: new\n  c: {}\n";
        let result = diff(old, new).unwrap();
        let types: Vec<ChangeType> = result.structural.iter().map(|c| c.change_type).collect();
        assert!(types.contains(&ChangeType::Modified));
        assert!(types.contains(&ChangeType::Removed));
        assert!(types.contains(&ChangeType::Added));
    }

    #[test]
    fn identical_configs_have_no_structural_changes() {
        let yaml = "paths:\n  a: {}\n";
        let result = diff(yaml, yaml).unwrap();
        assert!(result.structural.is_empty());
    }
}
