// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Pattern module provides the data model for structural partial matching
//!
//! A pattern is a nested tree mirroring the shape of the template fragment
//! it constrains. Leaves are matchers:
//! - `Exact` requires deep equality with a concrete value
//! - `Regex` requires a string fully matching an expression
//! - `Present` accepts any non-null value
//!
//! Interior nodes are `Map` (subset match against a mapping: keys the
//! pattern does not mention are ignored) and `Seq` (positional,
//! length-exact match against a sequence).
//!
//! # Example
//! ```
//! use stack_assert_pattern::{exact, map_of, regex};
//!
//! let pattern = map_of([
//!     ("QueueName", regex("orders(.*)").unwrap()),
//!     ("FifoQueue", exact(true)),
//! ]);
//! ```

mod builder;
mod constructors;
mod types;

// Core pattern tree
pub use types::Pattern;

// Generic constructors for assembling pattern trees
pub use constructors::{anchored, any_map, exact, map_of, present, regex, seq_of};

// Builder API for whole-resource patterns
pub use builder::{ResourcePattern, ResourcePatternBuilder};
