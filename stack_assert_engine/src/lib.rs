// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

mod assert;
mod engine;
mod explain;
mod query;

// Re-export our public API
pub use assert::ResourceAssert;
pub use assert::Template;
pub use engine::MatchOptions;
pub use engine::matches;
pub use engine::matches_with;
pub use explain::Mismatch;
pub use explain::explain;
pub use explain::explain_with;
pub use query::Document;
pub use query::find_resources;
pub use query::find_resources_with;
pub use query::has_resource;
pub use query::has_resource_with;
