// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::engine::{MatchOptions, matches_with};
use crate::explain::explain_with;
use anyhow::bail;
use serde_json::Value;
use stack_assert_pattern::Pattern;
use std::collections::BTreeMap;

/// The rendered template under test: resource id mapped to resource body.
/// Entry order carries no meaning.
pub type Document = serde_json::Map<String, Value>;

/// Selects the document entries of the given declared type whose body
/// structurally contains `pattern`, with default options.
///
/// The type filter is exact string equality on the `"Type"` field, never
/// matcher-based. The pattern is evaluated against the whole resource
/// body, so it may constrain `Properties`, `DependsOn` and policy fields
/// together. Returns zero, one or many entries preserving their ids; a
/// type absent from the document yields an empty map, not an error.
pub fn find_resources<'a>(
    document: &'a Document,
    type_name: &str,
    pattern: &Pattern,
) -> BTreeMap<&'a str, &'a Value> {
    find_resources_with(document, type_name, pattern, &MatchOptions::default())
}

/// Selects matching document entries of the given declared type
pub fn find_resources_with<'a>(
    document: &'a Document,
    type_name: &str,
    pattern: &Pattern,
    options: &MatchOptions,
) -> BTreeMap<&'a str, &'a Value> {
    document
        .iter()
        .filter(|(_, body)| declared_type(body) == Some(type_name))
        .filter(|(_, body)| matches_with(body, pattern, options))
        .map(|(id, body)| (id.as_str(), body))
        .collect()
}

/// Asserts that at least one entry of the given type contains `pattern`.
///
/// On failure the error names the resource type, renders the pattern, and
/// lists the nearest misses: every same-type resource with the first point
/// where it diverged from the pattern. Exact cardinality beyond "at least
/// one" is the caller's concern.
pub fn has_resource(
    document: &Document,
    type_name: &str,
    pattern: &Pattern,
) -> anyhow::Result<()> {
    has_resource_with(document, type_name, pattern, &MatchOptions::default())
}

pub fn has_resource_with(
    document: &Document,
    type_name: &str,
    pattern: &Pattern,
    options: &MatchOptions,
) -> anyhow::Result<()> {
    if !find_resources_with(document, type_name, pattern, options).is_empty() {
        return Ok(());
    }

    let candidates: Vec<(&str, String)> = document
        .iter()
        .filter(|(_, body)| declared_type(body) == Some(type_name))
        .map(|(id, body)| {
            let detail = match explain_with(body, pattern, options) {
                Some(found) => found.describe(),
                None => "matched unexpectedly".to_string(),
            };
            (id.as_str(), detail)
        })
        .collect();

    if candidates.is_empty() {
        bail!(
            "no resource of type {} found in the template (expected one matching {})",
            type_name,
            pattern.render()
        );
    }

    let mut message = format!(
        "no resource of type {} matched pattern {}\nNearest misses:",
        type_name,
        pattern.render()
    );
    for (id, detail) in &candidates {
        message.push_str(&format!("\n  {id}: {detail}"));
    }
    bail!(message);
}

fn declared_type(body: &Value) -> Option<&str> {
    body.get("Type").and_then(Value::as_str)
}
