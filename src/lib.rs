// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Structural partial-match assertions for rendered infrastructure
//! templates.
//!
//! A template test builds a [`Pattern`] describing the fragment of a
//! resource it cares about, then asserts that the rendered template
//! contains a resource of the expected type whose body is a superset of
//! that fragment. Keys the pattern does not mention are ignored, so tests
//! stay robust against generated names and unrelated properties.
//!
//! ```
//! use stack_assert::{Template, ResourcePattern, exact, regex};
//!
//! let template = Template::from_json(r#"{
//!     "OrdersQueueA1B2": {
//!         "Type": "AWS::SQS::Queue",
//!         "Properties": {"QueueName": "orders.fifo", "FifoQueue": true}
//!     }
//! }"#).unwrap();
//!
//! template.has(
//!     &ResourcePattern::of_type("AWS::SQS::Queue")
//!         .with_property("QueueName", regex("orders(.*)").unwrap())
//!         .with_property("FifoQueue", exact(true))
//!         .build(),
//! );
//! ```

// Pattern construction surface
pub use stack_assert_pattern::{
    NamedPattern, Pattern, PatternSet, ResourcePattern, ResourcePatternBuilder, any_map, exact,
    map_of, present, regex, seq_of,
};

// Match engine, queries and the assertion facade
pub use stack_assert_engine::{
    Document, MatchOptions, Mismatch, ResourceAssert, Template, explain, explain_with,
    find_resources, find_resources_with, has_resource, has_resource_with, matches, matches_with,
};
