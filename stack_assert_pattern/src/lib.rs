// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

mod pattern;
mod pattern_set;

// Core pattern tree and the generic constructors
pub use pattern::{Pattern, anchored, any_map, exact, map_of, present, regex, seq_of};

// Fluent resource pattern builder
pub use pattern::{ResourcePattern, ResourcePatternBuilder};

// Named pattern persistence
pub use pattern_set::{NamedPattern, PatternSet};
