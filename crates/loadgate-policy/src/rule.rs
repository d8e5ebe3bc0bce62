//! Offline policy document schema.
//!
//! A `PolicyDocument` is deserialized from TOML and holds an ordered list of
//! `SimulationRule`s plus the bucket fixtures the offline object store
//! serves. Rules are evaluated in declaration order and the first matching rule
//! decides. If no rule matches, the decision is `implicitDeny`.

use serde::{Deserialize, Serialize};

fn wildcard() -> String {
    "*".to_string()
}

/// Match `value` against `pattern`.
///
/// - `"*"` matches anything.
/// - A pattern ending in `*` matches any value with that prefix
///   (`neptune-graph:*`, `arn:aws:s3:::bucket/*`).
/// - Otherwise the match is exact and case-sensitive.
pub fn pattern_matches(pattern: &str, value: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.strip_suffix('*') {
        Some(prefix) => value.starts_with(prefix),
        None => pattern == value,
    }
}

/// A single simulation rule loaded from TOML.
///
/// Example:
/// ```toml
/// [[rules]]
/// id = "allow-graph-query"
/// description = "Load role may query the analytics graph"
/// action = "neptune-graph:*"
/// resource = "arn:aws:neptune-graph:us-east-1:123456789012:graph/g-abc"
/// decision = "allowed"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRule {
    /// Stable identifier, reported as the matched statement.
    pub id: String,

    #[serde(default)]
    pub description: String,

    /// Principal pattern. Defaults to `"*"`.
    #[serde(default = "wildcard")]
    pub principal: String,

    /// Action pattern, e.g. `"s3:GetObject"` or `"neptune-db:*"`.
    pub action: String,

    /// Resource pattern, e.g. `"arn:aws:s3:::bucket/*"`.
    pub resource: String,

    /// Decision string produced on match (`allowed`, `explicitDeny`, ...).
    pub decision: String,
}

impl SimulationRule {
    /// Return true if this rule applies to the triple.
    pub fn matches(&self, principal: &str, action: &str, resource: &str) -> bool {
        pattern_matches(&self.principal, principal)
            && pattern_matches(&self.action, action)
            && pattern_matches(&self.resource, resource)
    }
}

/// A bucket served by the offline object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketFixture {
    pub name: String,

    /// Object keys present in the bucket.
    #[serde(default)]
    pub objects: Vec<String>,

    /// When true, every listing fails as if a bucket policy or KMS key
    /// refused access.
    #[serde(default)]
    pub deny_list: bool,
}

/// The top-level structure deserialized from an offline policy file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Ordered list of rules. First match wins.
    #[serde(default)]
    pub rules: Vec<SimulationRule>,

    #[serde(default)]
    pub buckets: Vec<BucketFixture>,
}
