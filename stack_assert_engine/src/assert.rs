// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::engine::{MatchOptions, matches_with};
use crate::explain::explain_with;
use crate::query::{Document, find_resources_with, has_resource_with};
use anyhow::Context;
use regex::Regex;
use serde_json::Value;
use stack_assert_pattern::{Pattern, ResourcePattern, anchored, any_map, exact, map_of};
use std::collections::BTreeMap;

/// The rendered template under test, wrapped for assertions
///
/// Parsing is the only fallible surface; every assertion method panics
/// with a descriptive message on mismatch, which is the behavior a test
/// author wants from an assertion helper. The non-panicking query layer
/// stays available through `find_resources` and `try_has_resource`.
#[derive(Debug)]
pub struct Template {
    document: Document,
    options: MatchOptions,
}

impl Template {
    /// Wraps an already-parsed document. The value must be a mapping of
    /// resource id to resource body.
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        match value {
            Value::Object(document) => Ok(Template {
                document,
                options: MatchOptions::default(),
            }),
            other => anyhow::bail!(
                "template root must be a mapping of resource ids, found {}",
                type_label(&other)
            ),
        }
    }

    /// Parses a template from rendered JSON text
    pub fn from_json(rendered: &str) -> anyhow::Result<Self> {
        let value: Value =
            serde_json::from_str(rendered).context("failed to parse template JSON")?;
        Self::from_value(value)
    }

    /// Reads and parses a rendered template file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let rendered = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template file {}", path.display()))?;
        Self::from_json(&rendered)
    }

    /// Replaces the match options used by every subsequent query and
    /// assertion on this template
    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Matching entries of the given type, preserving resource ids
    pub fn find_resources(&self, type_name: &str, pattern: &Pattern) -> BTreeMap<&str, &Value> {
        find_resources_with(&self.document, type_name, pattern, &self.options)
    }

    /// Non-panicking form of `has_resource`
    pub fn try_has_resource(&self, type_name: &str, pattern: &Pattern) -> anyhow::Result<()> {
        has_resource_with(&self.document, type_name, pattern, &self.options)
    }

    /// Asserts that at least one resource of the given type contains the
    /// pattern; panics with the pattern and nearest misses otherwise
    pub fn has_resource(&self, type_name: &str, pattern: &Pattern) {
        if let Err(error) = self.try_has_resource(type_name, pattern) {
            panic!("{error:#}");
        }
    }

    /// Asserts a whole built `ResourcePattern` in one call
    pub fn has(&self, resource: &ResourcePattern) {
        self.has_resource(&resource.type_name, &resource.body);
    }

    /// Number of resources declaring the given type, pattern aside
    pub fn resource_count(&self, type_name: &str) -> usize {
        self.document
            .values()
            .filter(|body| body.get("Type").and_then(Value::as_str) == Some(type_name))
            .count()
    }

    /// Asserts the exact number of resources of the given type
    pub fn has_resource_count(&self, type_name: &str, expected: usize) {
        let found = self.resource_count(type_name);
        assert!(
            found == expected,
            "expected {expected} resources of type {type_name}, template has {found}"
        );
    }

    /// Wraps the resource with the given id for chained assertions;
    /// panics if the id is absent
    pub fn resource(&self, id: &str) -> ResourceAssert<'_> {
        match self.document.get(id) {
            Some(body) => ResourceAssert {
                id: id.to_string(),
                body,
                options: self.options,
            },
            None => panic!(
                "no resource with id {} in the template (ids: [{}])",
                id,
                self.document.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    /// Wraps the single resource of the given type; panics with counts
    /// when the template holds zero or several
    pub fn sole_resource(&self, type_name: &str) -> ResourceAssert<'_> {
        let matching = self.find_resources(type_name, &any_map());
        match matching.len() {
            1 => {
                let (id, body) = matching.into_iter().next().unwrap();
                ResourceAssert {
                    id: id.to_string(),
                    body,
                    options: self.options,
                }
            }
            count => panic!("expected exactly one resource of type {type_name}, template has {count}"),
        }
    }
}

/// Chainable assertions over one resolved resource
///
/// Each predicate is a named partial-match shortcut: it builds a small
/// pattern, runs the engine against the relevant sub-path of the wrapped
/// body, and panics with the field path, expected matcher and actual
/// value on mismatch.
#[derive(Clone, Debug)]
pub struct ResourceAssert<'a> {
    id: String,
    body: &'a Value,
    options: MatchOptions,
}

impl<'a> ResourceAssert<'a> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &'a Value {
        self.body
    }

    // Shared failure path: run explain against the body and panic with
    // the resource id and mismatch detail
    fn assert_body(&self, pattern: &Pattern) -> &Self {
        if let Some(found) = explain_with(self.body, pattern, &self.options) {
            panic!("resource {}: {}", self.id, found.describe());
        }
        self
    }

    /// Asserts the declared `Type` of the resource
    pub fn has_type(&self, type_name: &str) -> &Self {
        self.assert_body(&map_of([("Type", exact(type_name))]))
    }

    /// Asserts a pattern against a dotted path into the resource body,
    /// e.g. `"Properties.Tags[0].Key"` or `"Properties.MemorySize"`
    pub fn has_property(&self, path: &str, pattern: &Pattern) -> &Self {
        match lookup_path(self.body, path) {
            Some(value) => {
                if let Some(found) = explain_with(value, pattern, &self.options) {
                    let nested = if found.path.is_empty() {
                        path.to_string()
                    } else if found.path.starts_with('[') {
                        format!("{path}{}", found.path)
                    } else {
                        format!("{path}.{}", found.path)
                    };
                    panic!(
                        "resource {}: at {}: expected {} but found {}",
                        self.id, nested, found.expected, found.actual
                    );
                }
            }
            None => panic!(
                "resource {}: at {}: expected {} but found absent",
                self.id,
                path,
                describe_for_panic(pattern)
            ),
        }
        self
    }

    /// Asserts that `Properties.Tags` carries the given key/value pair
    pub fn has_tag(&self, key: &str, value: &str) -> &Self {
        let tag_pattern = map_of([("Key", exact(key)), ("Value", exact(value))]);
        let tags = match lookup_path(self.body, "Properties.Tags") {
            Some(Value::Array(tags)) => tags,
            Some(other) => panic!(
                "resource {}: at Properties.Tags: expected a sequence of tags but found {}",
                self.id,
                render(other)
            ),
            None => panic!(
                "resource {}: expected tag {}={} but the resource has no Properties.Tags",
                self.id, key, value
            ),
        };
        if !tags
            .iter()
            .any(|tag| matches_with(tag, &tag_pattern, &self.options))
        {
            panic!(
                "resource {}: expected tag {}={} but tags are {}",
                self.id,
                key,
                value,
                render(&Value::Array(tags.clone()))
            );
        }
        self
    }

    /// Asserts that some element of `DependsOn` fully matches the regex
    pub fn has_dependency(&self, pattern: &str) -> &Self {
        let regex = match Regex::new(&anchored(pattern)) {
            Ok(regex) => regex,
            Err(error) => panic!("invalid dependency pattern '{pattern}': {error}"),
        };
        let depends_on = match self.body.get("DependsOn") {
            Some(Value::Array(ids)) => ids.clone(),
            // A single dependency may be rendered unwrapped
            Some(sole @ Value::String(_)) => vec![sole.clone()],
            Some(other) => panic!(
                "resource {}: at DependsOn: expected a sequence of ids but found {}",
                self.id,
                render(other)
            ),
            None => panic!(
                "resource {}: expected a dependency matching /{}/ but the resource has no DependsOn",
                self.id, pattern
            ),
        };
        if !depends_on
            .iter()
            .any(|id| id.as_str().is_some_and(|id| regex.is_match(id)))
        {
            panic!(
                "resource {}: expected a dependency matching /{}/ but DependsOn is {}",
                self.id,
                pattern,
                render(&Value::Array(depends_on))
            );
        }
        self
    }

    /// Asserts the `DeletionPolicy` attribute
    pub fn has_deletion_policy(&self, value: impl Into<Value>) -> &Self {
        self.assert_body(&map_of([("DeletionPolicy", exact(value))]))
    }

    /// Asserts the `UpdateReplacePolicy` attribute
    pub fn has_update_replace_policy(&self, value: impl Into<Value>) -> &Self {
        self.assert_body(&map_of([("UpdateReplacePolicy", exact(value))]))
    }

    /// Asserts one entry of `Properties.Environment.Variables`
    pub fn has_environment_variable(&self, key: &str, value: impl Into<Value>) -> &Self {
        let path = format!("Properties.Environment.Variables.{key}");
        self.has_property(&path, &exact(value))
    }

    /// Asserts `Properties.MemorySize`
    pub fn has_memory_size(&self, megabytes: u64) -> &Self {
        self.has_property("Properties.MemorySize", &exact(megabytes))
    }
}

// Resolves a dotted path with optional [index] segments against a value
// tree; None when any segment is absent or the shape disagrees
fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        let (key, indexes) = split_indexes(segment)?;
        if !key.is_empty() {
            current = current.get(key)?;
        }
        for index in indexes {
            current = current.get(index)?;
        }
    }
    Some(current)
}

// Splits "Tags[0][1]" into ("Tags", [0, 1]); None on malformed brackets
fn split_indexes(segment: &str) -> Option<(&str, Vec<usize>)> {
    match segment.find('[') {
        None => Some((segment, Vec::new())),
        Some(open) => {
            let (key, rest) = segment.split_at(open);
            let mut indexes = Vec::new();
            for part in rest.split('[').skip(1) {
                let digits = part.strip_suffix(']')?;
                indexes.push(digits.parse().ok()?);
            }
            Some((key, indexes))
        }
    }
}

fn describe_for_panic(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Exact(value) => render(value),
        Pattern::Regex(source) => format!("a string matching /{source}/"),
        Pattern::Present => "any non-null value".to_string(),
        other => other.render(),
    }
}

fn render(value: &Value) -> String {
    match serde_json::to_string(value) {
        Ok(rendered) => rendered,
        Err(_) => format!("{value:?}"),
    }
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
