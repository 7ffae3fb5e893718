// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::types::Pattern;
use anyhow::Context;
use regex::Regex;
use serde_json::Value;

/// Matches iff the actual value deep-equals `value`
///
/// Accepts anything convertible to a JSON value, so scalars work directly:
/// `exact("orders.fifo")`, `exact(true)`, `exact(512)`.
pub fn exact(value: impl Into<Value>) -> Pattern {
    Pattern::Exact(value.into())
}

/// Matches iff the actual value is a string fully matching `pattern`
///
/// The expression is anchored at both ends when evaluated, so
/// `regex("abc")` matches `"abc"` but not `"xabcx"`; use an explicit
/// wildcard (`"abc(.*)"`) for prefix-style matches.
///
/// A malformed expression is rejected here, at construction time, rather
/// than surfacing as a silent non-match later.
pub fn regex(pattern: impl Into<String>) -> anyhow::Result<Pattern> {
    let source = pattern.into();
    Regex::new(&anchored(&source))
        .with_context(|| format!("invalid regex pattern '{source}'"))?;
    Ok(Pattern::Regex(source))
}

/// Matches any non-null actual value, whatever its type
pub fn present() -> Pattern {
    Pattern::Present
}

/// Matches a mapping that contains every listed key with a matching value
///
/// Keys the pattern does not mention are ignored; `map_of([])` matches any
/// mapping.
pub fn map_of<K: Into<String>>(entries: impl IntoIterator<Item = (K, Pattern)>) -> Pattern {
    Pattern::Map(
        entries
            .into_iter()
            .map(|(key, pattern)| (key.into(), pattern))
            .collect(),
    )
}

/// Matches any mapping at all, whatever its keys
///
/// The empty map pattern: useful when only the resource type should
/// filter, or as a "this key holds some mapping" leaf.
pub fn any_map() -> Pattern {
    Pattern::Map(std::collections::BTreeMap::new())
}

/// Matches a sequence of exactly the listed length, element by position
///
/// `seq_of([])` matches only the empty sequence.
pub fn seq_of(elements: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Seq(elements.into_iter().collect())
}

/// Wraps a regex source so `is_match` has full-string semantics.
pub fn anchored(source: &str) -> String {
    format!("^(?:{source})$")
}
