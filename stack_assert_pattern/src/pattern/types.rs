// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One node of a pattern tree
///
/// The node's shape decides the comparison strategy: a `Map` pattern only
/// matches a mapping, a `Seq` pattern only matches a sequence, and a leaf
/// matcher is checked against whatever value sits at its position. No
/// coercion happens between shapes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Pattern {
    /// Matches iff the actual value deep-equals this value.
    ///
    /// Unlike `Map`, an `Exact` wrapping a mapping demands full equality:
    /// every key must be present and no extra keys are tolerated.
    Exact(Value),
    /// Matches iff the actual value is a string fully matching this
    /// expression (anchored, not substring search)
    Regex(String),
    /// Matches any non-null actual value
    Present,
    /// Matches a mapping containing every listed key with a matching value;
    /// keys absent from the pattern are ignored
    Map(BTreeMap<String, Pattern>),
    /// Matches a sequence of exactly this length, element-wise by position
    Seq(Vec<Pattern>),
}

impl Pattern {
    /// Mechanically derive a pattern mirroring `value` exactly.
    ///
    /// Mappings become `Map` nodes (one entry per key), sequences become
    /// `Seq` nodes, and scalars become `Exact` leaves. Matching a value
    /// against the pattern derived from it always succeeds.
    pub fn from_value(value: &Value) -> Pattern {
        match value {
            Value::Object(map) => Pattern::Map(
                map.iter()
                    .map(|(key, nested)| (key.clone(), Pattern::from_value(nested)))
                    .collect(),
            ),
            Value::Array(items) => Pattern::Seq(items.iter().map(Pattern::from_value).collect()),
            scalar => Pattern::Exact(scalar.clone()),
        }
    }

    /// Renders the pattern for failure messages.
    pub fn render(&self) -> String {
        match serde_json::to_string(self) {
            Ok(rendered) => rendered,
            Err(_) => format!("{self:?}"),
        }
    }
}
