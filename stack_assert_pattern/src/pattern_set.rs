use anyhow::Context;
use ron::de::from_reader;
use ron::ser::{PrettyConfig, to_writer_pretty};
// pattern_set.rs
use crate::pattern::{Pattern, ResourcePattern};
use serde::{Deserialize, Serialize};
use std::fs::File;

/// One shared expected-resource definition, addressable by name
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NamedPattern {
    pub name: String,
    pub resource_type: String,
    pub pattern: Pattern,
}

/// A collection of named patterns that a suite can persist as a checked-in
/// `.ron` file and reload across test crates
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatternSet {
    pub patterns: Vec<NamedPattern>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, resource: ResourcePattern) {
        self.patterns.push(NamedPattern {
            name: name.into(),
            resource_type: resource.type_name,
            pattern: resource.body,
        });
    }

    /// Looks a pattern up by the name it was pushed under
    pub fn get(&self, name: &str) -> Option<&NamedPattern> {
        self.patterns.iter().find(|named| named.name == name)
    }

    // Method to write the PatternSet to a file
    pub fn write_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create pattern file {}", path.display()))?;
        to_writer_pretty(file, &self.patterns, PrettyConfig::default())
            .with_context(|| format!("failed to serialize patterns to {}", path.display()))?;
        Ok(())
    }

    // Method to read a PatternSet back from a file
    pub fn read_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open pattern file {}", path.display()))?;

        let patterns: Vec<NamedPattern> = from_reader(file)
            .with_context(|| format!("failed to parse patterns from {}", path.display()))?;

        Ok(PatternSet { patterns })
    }
}
