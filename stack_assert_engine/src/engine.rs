// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use regex::Regex;
use serde_json::Value;
use stack_assert_pattern::{Pattern, anchored};

/// Knobs for the structural match walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// When set, a single-element sequence on either side is unwrapped to
    /// its sole element before comparison, so `Seq([p])` can match a bare
    /// scalar and a leaf matcher can match `[scalar]`. Mirrors renderers
    /// that serialize single-element arrays unwrapped. Off by default: the
    /// engine otherwise never coerces between shapes.
    pub unwrap_single_element_seqs: bool,
}

/// Tests whether `actual` structurally contains `pattern`, with default
/// options.
///
/// Containment is partial: a `Map` pattern only constrains the keys it
/// declares, and extra keys in the actual mapping are ignored. Sequences
/// are compared positionally and must have the pattern's exact length.
/// Shape mismatches and missing keys are non-matches, never errors; the
/// walk is bounded by the size of the pattern, not the document.
pub fn matches(actual: &Value, pattern: &Pattern) -> bool {
    matches_with(actual, pattern, &MatchOptions::default())
}

/// Tests whether `actual` structurally contains `pattern`
pub fn matches_with(actual: &Value, pattern: &Pattern, options: &MatchOptions) -> bool {
    if options.unwrap_single_element_seqs {
        if let Pattern::Seq(elements) = pattern {
            if elements.len() == 1 && !actual.is_array() {
                return matches_with(actual, &elements[0], options);
            }
        }
        if let Value::Array(items) = actual {
            // Try the strict comparison first so Exact([x]) still matches [x]
            // and Seq([p]) still matches [x] positionally
            if items.len() == 1 {
                return matches_strict(actual, pattern, options)
                    || matches_with(&items[0], pattern, options);
            }
        }
    }
    matches_strict(actual, pattern, options)
}

// Evaluates one pattern node against one actual node, one arm per variant
fn matches_strict(actual: &Value, pattern: &Pattern, options: &MatchOptions) -> bool {
    match pattern {
        Pattern::Exact(expected) => actual == expected,
        Pattern::Regex(source) => match actual {
            Value::String(candidate) => match Regex::new(&anchored(source)) {
                Ok(regex) => regex.is_match(candidate),
                Err(_) => false,
            },
            _ => false,
        },
        Pattern::Present => !actual.is_null(),
        Pattern::Map(entries) => match actual {
            Value::Object(map) => entries.iter().all(|(key, sub_pattern)| {
                map.get(key)
                    .is_some_and(|nested| matches_with(nested, sub_pattern, options))
            }),
            _ => false,
        },
        Pattern::Seq(elements) => match actual {
            Value::Array(items) => {
                items.len() == elements.len()
                    && elements
                        .iter()
                        .zip(items.iter())
                        .all(|(sub_pattern, item)| matches_with(item, sub_pattern, options))
            }
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stack_assert_pattern::{Pattern, any_map, exact, map_of, present, regex, seq_of};

    #[test]
    fn test_exact_scalar_equality() {
        assert!(matches(&json!("orders.fifo"), &exact("orders.fifo")));
        assert!(!matches(&json!("payments.fifo"), &exact("orders.fifo")));
        assert!(matches(&json!(512), &exact(512)));
        assert!(!matches(&json!(512), &exact("512")));
    }

    #[test]
    fn test_exact_null_matches_null() {
        assert!(matches(&json!(null), &exact(serde_json::Value::Null)));
        assert!(!matches(&json!(null), &exact("anything")));
    }

    #[test]
    fn test_exact_map_requires_full_equality() {
        // Pattern::Map is a subset match; Exact wrapping a map is not
        let actual = json!({"a": 1, "b": 2});
        assert!(matches(&actual, &map_of([("a", exact(1))])));
        assert!(!matches(&actual, &exact(json!({"a": 1}))));
        assert!(matches(&actual, &exact(json!({"a": 1, "b": 2}))));
    }

    #[test]
    fn test_regex_is_anchored_full_match() {
        assert!(matches(&json!("abc"), &regex("abc").unwrap()));
        assert!(!matches(&json!("xabcx"), &regex("abc").unwrap()));
        assert!(matches(&json!("abc123"), &regex("abc(.*)").unwrap()));
    }

    #[test]
    fn test_regex_fails_on_non_string() {
        assert!(!matches(&json!(123), &regex("123").unwrap()));
        assert!(!matches(&json!(null), &regex(".*").unwrap()));
        assert!(!matches(&json!(["abc"]), &regex("abc").unwrap()));
    }

    #[test]
    fn test_present_accepts_any_non_null() {
        assert!(matches(&json!("x"), &present()));
        assert!(matches(&json!(0), &present()));
        assert!(matches(&json!(false), &present()));
        assert!(matches(&json!([]), &present()));
        assert!(matches(&json!({}), &present()));
        assert!(!matches(&json!(null), &present()));
    }

    #[test]
    fn test_map_pattern_is_partial() {
        let actual = json!({"QueueName": "orders.fifo", "FifoQueue": true, "DelaySeconds": 0});
        assert!(matches(&actual, &map_of([("QueueName", exact("orders.fifo"))])));
        assert!(matches(
            &actual,
            &map_of([("QueueName", exact("orders.fifo")), ("FifoQueue", exact(true))])
        ));
        assert!(!matches(&actual, &map_of([("QueueName", exact("payments.fifo"))])));
    }

    #[test]
    fn test_map_pattern_missing_key_is_non_match() {
        let actual = json!({"QueueName": "orders.fifo"});
        assert!(!matches(&actual, &map_of([("TopicName", present())])));
    }

    #[test]
    fn test_map_pattern_against_non_map_fails() {
        let pattern = map_of([("a", exact(1))]);
        assert!(!matches(&json!("scalar"), &pattern));
        assert!(!matches(&json!([{"a": 1}]), &pattern));
        assert!(!matches(&json!(null), &pattern));
    }

    #[test]
    fn test_empty_map_pattern_matches_any_map() {
        assert!(matches(&json!({}), &any_map()));
        assert!(matches(&json!({"a": 1}), &any_map()));
        assert!(!matches(&json!([]), &any_map()));
        assert!(!matches(&json!("x"), &any_map()));
    }

    #[test]
    fn test_seq_pattern_is_positional_and_length_exact() {
        let pattern = seq_of([exact(1), exact(2)]);
        assert!(matches(&json!([1, 2]), &pattern));
        assert!(!matches(&json!([1, 2, 3]), &pattern));
        assert!(!matches(&json!([1]), &pattern));
        assert!(!matches(&json!([2, 1]), &pattern));
    }

    #[test]
    fn test_empty_seq_pattern_matches_only_empty_seq() {
        assert!(matches(&json!([]), &seq_of([])));
        assert!(!matches(&json!([1]), &seq_of([])));
        assert!(!matches(&json!({}), &seq_of([])));
    }

    #[test]
    fn test_seq_pattern_against_non_seq_fails() {
        assert!(!matches(&json!("1,2"), &seq_of([exact(1), exact(2)])));
        assert!(!matches(&json!({"0": 1}), &seq_of([exact(1)])));
    }

    #[test]
    fn test_nested_recursion() {
        let actual = json!({
            "Properties": {
                "Tags": [{"Key": "ENV", "Value": "test"}],
                "QueueName": "orders.fifo"
            }
        });
        let pattern = map_of([(
            "Properties",
            map_of([(
                "Tags",
                seq_of([map_of([("Key", exact("ENV")), ("Value", present())])]),
            )]),
        )]);
        assert!(matches(&actual, &pattern));
    }

    #[test]
    fn test_reflexivity_of_derived_patterns() {
        let fragments = [
            json!({"QueueName": "orders.fifo", "Tags": [{"Key": "ENV", "Value": "test"}]}),
            json!([1, "two", null, {"three": 3}]),
            json!("scalar"),
            json!(null),
            json!({}),
        ];
        for fragment in &fragments {
            assert!(
                matches(fragment, &Pattern::from_value(fragment)),
                "fragment should match its own derived pattern: {fragment}"
            );
        }
    }

    #[test]
    fn test_monotonic_restriction() {
        // Removing keys from a map pattern only weakens it; adding keys
        // only strengthens it.
        let actual = json!({"a": 1, "b": 2});
        let weaker = map_of([("a", exact(1))]);
        let stronger = map_of([("a", exact(1)), ("b", exact(2)), ("c", exact(3))]);
        assert!(matches(&actual, &weaker));
        assert!(!matches(&actual, &stronger));
    }

    #[test]
    fn test_unwrap_single_element_seqs_disabled_by_default() {
        let pattern = seq_of([exact("sqs:SendMessage")]);
        assert!(!matches(&json!("sqs:SendMessage"), &pattern));
        assert!(!matches(&json!(["sqs:SendMessage"]), &exact("sqs:SendMessage")));
    }

    #[test]
    fn test_unwrap_single_element_seqs_pattern_side() {
        let options = MatchOptions { unwrap_single_element_seqs: true };
        let pattern = seq_of([exact("sqs:SendMessage")]);
        assert!(matches_with(&json!("sqs:SendMessage"), &pattern, &options));
        assert!(matches_with(&json!(["sqs:SendMessage"]), &pattern, &options));
    }

    #[test]
    fn test_unwrap_single_element_seqs_actual_side() {
        let options = MatchOptions { unwrap_single_element_seqs: true };
        assert!(matches_with(
            &json!(["sqs:SendMessage"]),
            &exact("sqs:SendMessage"),
            &options
        ));
        assert!(matches_with(&json!(["abc123"]), &regex("abc(.*)").unwrap(), &options));
        // Exact-of-array still matches the array itself
        assert!(matches_with(
            &json!(["sqs:SendMessage"]),
            &exact(json!(["sqs:SendMessage"])),
            &options
        ));
    }

    #[test]
    fn test_unwrap_actual_side_applies_to_seq_patterns_too() {
        // A single-element outer array unwraps to its inner sequence,
        // which the pattern then matches positionally
        let options = MatchOptions { unwrap_single_element_seqs: true };
        let pattern = seq_of([exact(1), exact(2)]);
        assert!(matches_with(&json!([[1, 2]]), &pattern, &options));
        assert!(!matches_with(&json!([[2, 1]]), &pattern, &options));
        assert!(!matches_with(&json!([[1, 2]]), &pattern, &MatchOptions::default()));
    }

    #[test]
    fn test_unwrap_does_not_apply_to_longer_seqs() {
        let options = MatchOptions { unwrap_single_element_seqs: true };
        let pattern = seq_of([exact(1), exact(2)]);
        assert!(!matches_with(&json!(1), &pattern, &options));
        assert!(matches_with(&json!([1, 2]), &pattern, &options));
    }
}
