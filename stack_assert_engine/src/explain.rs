// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::engine::{MatchOptions, matches_with};
use serde_json::Value;
use stack_assert_pattern::Pattern;

/// The first point where a value stopped satisfying a pattern
///
/// Carries enough to build a failure message a test author can act on:
/// the path into the value, what the pattern expected there, and what was
/// actually found.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Dotted path from the compared root, e.g. `Properties.Tags[0].Value`;
    /// empty for a mismatch at the root itself
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl Mismatch {
    /// One-line rendering used in assertion failures
    pub fn describe(&self) -> String {
        if self.path.is_empty() {
            format!("expected {} but found {}", self.expected, self.actual)
        } else {
            format!(
                "at {}: expected {} but found {}",
                self.path, self.expected, self.actual
            )
        }
    }
}

/// Finds the first mismatch between `actual` and `pattern` in pattern
/// order, with default options; `None` when the pattern matches
pub fn explain(actual: &Value, pattern: &Pattern) -> Option<Mismatch> {
    explain_with(actual, pattern, &MatchOptions::default())
}

/// Finds the first mismatch between `actual` and `pattern` in pattern order
pub fn explain_with(actual: &Value, pattern: &Pattern, options: &MatchOptions) -> Option<Mismatch> {
    explain_at(actual, pattern, options, "")
}

fn explain_at(
    actual: &Value,
    pattern: &Pattern,
    options: &MatchOptions,
    path: &str,
) -> Option<Mismatch> {
    // The engine is the single source of truth for what matches; the walk
    // below only localizes a mismatch the engine already established
    if matches_with(actual, pattern, options) {
        return None;
    }
    match pattern {
        Pattern::Map(entries) => {
            let Value::Object(map) = actual else {
                return Some(mismatch(path, pattern, Some(actual)));
            };
            for (key, sub_pattern) in entries {
                let child_path = join_key(path, key);
                match map.get(key) {
                    None => return Some(mismatch(&child_path, sub_pattern, None)),
                    Some(nested) => {
                        if let Some(found) = explain_at(nested, sub_pattern, options, &child_path) {
                            return Some(found);
                        }
                    }
                }
            }
            None
        }
        Pattern::Seq(elements) => {
            let Value::Array(items) = actual else {
                return Some(mismatch(path, pattern, Some(actual)));
            };
            if items.len() != elements.len() {
                return Some(mismatch(path, pattern, Some(actual)));
            }
            for (index, (sub_pattern, item)) in elements.iter().zip(items.iter()).enumerate() {
                let child_path = format!("{path}[{index}]");
                if let Some(found) = explain_at(item, sub_pattern, options, &child_path) {
                    return Some(found);
                }
            }
            None
        }
        // A leaf that matched would have returned above
        leaf => Some(mismatch(path, leaf, Some(actual))),
    }
}

fn mismatch(path: &str, pattern: &Pattern, actual: Option<&Value>) -> Mismatch {
    Mismatch {
        path: path.to_string(),
        expected: describe_pattern(pattern),
        actual: match actual {
            Some(value) => render_value(value),
            None => "absent".to_string(),
        },
    }
}

fn describe_pattern(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Exact(value) => render_value(value),
        Pattern::Regex(source) => format!("a string matching /{source}/"),
        Pattern::Present => "any non-null value".to_string(),
        Pattern::Map(entries) => {
            let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
            format!("a mapping with keys [{}]", keys.join(", "))
        }
        Pattern::Seq(elements) => match elements.len() {
            1 => "a sequence of 1 element".to_string(),
            n => format!("a sequence of {n} elements"),
        },
    }
}

fn render_value(value: &Value) -> String {
    match serde_json::to_string(value) {
        Ok(rendered) => rendered,
        Err(_) => format!("{value:?}"),
    }
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
