use super::constructors::exact;
use super::types::Pattern;
use serde_json::Value;
use std::collections::BTreeMap;

/// A complete expected-resource description: the declared resource type
/// plus a pattern for the resource body
///
/// The type name is matched by exact string equality when querying a
/// template; the body pattern is evaluated structurally against the whole
/// resource entry, so it may constrain `Properties`, `DependsOn` and the
/// policy fields together.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePattern {
    pub type_name: String,
    pub body: Pattern,
}

impl ResourcePattern {
    /// Starts a fluent builder for a resource of the given declared type
    pub fn of_type(type_name: impl Into<String>) -> ResourcePatternBuilder {
        ResourcePatternBuilder {
            type_name: type_name.into(),
            properties: BTreeMap::new(),
            attributes: BTreeMap::new(),
            depends_on: None,
        }
    }
}

// Fluent builder composing the generic constructors into a whole-resource
// pattern. Finish with build().
pub struct ResourcePatternBuilder {
    type_name: String,
    properties: BTreeMap<String, Pattern>,
    attributes: BTreeMap<String, Pattern>,
    depends_on: Option<Vec<Pattern>>,
}

impl ResourcePatternBuilder {
    // Private method to add a top-level attribute directly to self
    fn add_attribute_internal(&mut self, key: impl Into<String>, pattern: Pattern) {
        self.attributes.insert(key.into(), pattern);
    }

    /// Constrains one entry under `Properties`
    pub fn with_property(mut self, key: impl Into<String>, pattern: Pattern) -> Self {
        self.properties.insert(key.into(), pattern);
        self
    }

    /// Constrains several entries under `Properties` at once
    pub fn with_properties<K: Into<String>>(
        mut self,
        entries: impl IntoIterator<Item = (K, Pattern)>,
    ) -> Self {
        for (key, pattern) in entries {
            self.properties.insert(key.into(), pattern);
        }
        self
    }

    /// Constrains the full `DependsOn` list, positionally.
    ///
    /// The declared elements must account for every dependency in order;
    /// for an any-element check use the assertion facade's dependency
    /// helper instead.
    pub fn depends_on_exactly(mut self, elements: impl IntoIterator<Item = Pattern>) -> Self {
        self.depends_on = Some(elements.into_iter().collect());
        self
    }

    /// Requires `DeletionPolicy` to equal the given value
    pub fn deletion_policy(mut self, value: impl Into<Value>) -> Self {
        self.add_attribute_internal("DeletionPolicy", exact(value));
        self
    }

    /// Requires `UpdateReplacePolicy` to equal the given value
    pub fn update_replace_policy(mut self, value: impl Into<Value>) -> Self {
        self.add_attribute_internal("UpdateReplacePolicy", exact(value));
        self
    }

    /// Constrains an arbitrary top-level resource attribute
    pub fn with_attribute(mut self, key: impl Into<String>, pattern: Pattern) -> Self {
        self.add_attribute_internal(key, pattern);
        self
    }

    pub fn build(self) -> ResourcePattern {
        let mut body = self.attributes;
        if !self.properties.is_empty() {
            body.insert("Properties".to_string(), Pattern::Map(self.properties));
        }
        if let Some(elements) = self.depends_on {
            body.insert("DependsOn".to_string(), Pattern::Seq(elements));
        }
        ResourcePattern {
            type_name: self.type_name,
            body: Pattern::Map(body),
        }
    }
}
