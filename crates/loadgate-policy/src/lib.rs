//! # loadgate-policy
//!
//! Offline, TOML-driven stand-ins for the AWS collaborators.
//!
//! ## Overview
//!
//! This crate provides [`StaticSimulator`], which implements
//! [`PermissionSimulator`](loadgate_core::traits::PermissionSimulator) by
//! evaluating ordered rules, and [`StaticObjectStore`], which serves bucket
//! listings from fixtures. Both are built from one [`PolicyDocument`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use loadgate_policy::PolicyDocument;
//!
//! let doc = PolicyDocument::from_file(Path::new("policies/offline.toml"))?;
//! let simulator = doc.simulator();
//! let store = doc.object_store();
//! ```
//!
//! ## Rule matching
//!
//! Each rule has `principal`, `action` and `resource` patterns. `"*"` matches
//! anything and a trailing `*` matches by prefix. The first match wins; no
//! match is an implicit deny.

pub mod engine;
pub mod rule;

pub use engine::{StaticObjectStore, StaticSimulator};
pub use rule::{BucketFixture, PolicyDocument, SimulationRule};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use loadgate_contracts::{error::LoadgateError, simulation::Decision};
    use loadgate_core::traits::{ObjectStore, PermissionSimulator};

    use crate::{rule::pattern_matches, PolicyDocument};

    const PRINCIPAL: &str = "arn:aws:iam::123456789012:role/LoadRole";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── 1. pattern matching ───────────────────────────────────────────────────

    #[test]
    fn test_pattern_matching() {
        assert!(pattern_matches("*", "anything"));
        assert!(pattern_matches("neptune-graph:*", "neptune-graph:ReadDataViaQuery"));
        assert!(!pattern_matches("neptune-graph:*", "neptune-db:ReadDataViaQuery"));
        assert!(pattern_matches("s3:GetObject", "s3:GetObject"));
        assert!(!pattern_matches("s3:GetObject", "s3:getobject"));
    }

    // ── 2. deny-by-default ────────────────────────────────────────────────────

    #[test]
    fn test_implicit_deny_by_default() {
        let doc = PolicyDocument::from_toml_str("rules = []").unwrap();
        let results = doc
            .simulator()
            .simulate(PRINCIPAL, &strings(&["s3:GetObject"]), &strings(&["*"]))
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].decision, Decision::implicit_deny());
        assert!(results[0].matched_statements.is_empty());
    }

    // ── 3. first match wins ───────────────────────────────────────────────────

    #[test]
    fn test_first_match_wins() {
        let toml = r#"
            [[rules]]
            id = "allow-graph"
            action = "neptune-graph:*"
            resource = "*"
            decision = "allowed"

            [[rules]]
            id = "deny-delete"
            action = "neptune-graph:DeleteDataViaQuery"
            resource = "*"
            decision = "explicitDeny"
        "#;

        let doc = PolicyDocument::from_toml_str(toml).unwrap();
        let results = doc
            .simulator()
            .simulate(
                PRINCIPAL,
                &strings(&["neptune-graph:DeleteDataViaQuery"]),
                &strings(&["*"]),
            )
            .unwrap();

        assert!(results[0].decision.is_allowed());
        assert_eq!(results[0].matched_statements[0].source_policy_id, "allow-graph");
    }

    // ── 4. per-resource combination ───────────────────────────────────────────

    /// ListBucket is allowed on the bucket but not on the object pattern: the
    /// combined result must be a denial.
    #[test]
    fn test_any_resource_denial_denies_action() {
        let toml = r#"
            [[rules]]
            id = "get-objects"
            action = "s3:GetObject"
            resource = "arn:aws:s3:::csvs/*"
            decision = "allowed"

            [[rules]]
            id = "list-bucket"
            action = "s3:ListBucket"
            resource = "arn:aws:s3:::csvs"
            decision = "allowed"

            [[rules]]
            id = "get-on-bucket"
            action = "s3:GetObject"
            resource = "arn:aws:s3:::csvs"
            decision = "allowed"
        "#;

        let doc = PolicyDocument::from_toml_str(toml).unwrap();
        let results = doc
            .simulator()
            .simulate(
                PRINCIPAL,
                &strings(&["s3:GetObject", "s3:ListBucket"]),
                &strings(&["arn:aws:s3:::csvs", "arn:aws:s3:::csvs/nodes/*"]),
            )
            .unwrap();

        assert!(results[0].decision.is_allowed(), "GetObject allowed on both scopes");
        assert_eq!(results[1].action, "s3:ListBucket");
        assert_eq!(results[1].decision, Decision::implicit_deny());
    }

    #[test]
    fn test_explicit_deny_overrides() {
        let toml = r#"
            [[rules]]
            id = "deny-objects"
            action = "*"
            resource = "arn:aws:s3:::csvs/*"
            decision = "explicitDeny"

            [[rules]]
            id = "allow-all"
            action = "*"
            resource = "*"
            decision = "allowed"
        "#;

        let doc = PolicyDocument::from_toml_str(toml).unwrap();
        let results = doc
            .simulator()
            .simulate(
                PRINCIPAL,
                &strings(&["s3:GetObject"]),
                &strings(&["arn:aws:s3:::csvs", "arn:aws:s3:::csvs/*"]),
            )
            .unwrap();

        assert_eq!(results[0].decision, Decision::explicit_deny());
        assert_eq!(results[0].matched_statements.len(), 1);
        assert_eq!(results[0].matched_statements[0].source_policy_id, "deny-objects");
    }

    #[test]
    fn test_principal_pattern_is_honoured() {
        let toml = r#"
            [[rules]]
            id = "other-role-only"
            principal = "arn:aws:iam::123456789012:role/Other"
            action = "*"
            resource = "*"
            decision = "allowed"
        "#;

        let doc = PolicyDocument::from_toml_str(toml).unwrap();
        let results = doc
            .simulator()
            .simulate(PRINCIPAL, &strings(&["s3:GetObject"]), &strings(&["*"]))
            .unwrap();
        assert!(!results[0].decision.is_allowed());
    }

    #[test]
    fn test_no_resources_is_simulation_error() {
        let doc = PolicyDocument::default();
        let result = doc.simulator().simulate(PRINCIPAL, &strings(&["s3:GetObject"]), &[]);
        assert!(matches!(result, Err(LoadgateError::SimulationFailed { .. })));
    }

    // ── 5. object store ───────────────────────────────────────────────────────

    #[test]
    fn test_object_store_lists_under_prefix() {
        let toml = r#"
            [[buckets]]
            name = "csvs"
            objects = ["other/x.csv", "a/b/nodes.csv", "a/b/edges.csv"]
        "#;

        let store = PolicyDocument::from_toml_str(toml).unwrap().object_store();

        let one = store.list_objects("csvs", Some("a/b"), 1).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].key, "a/b/nodes.csv");

        let all = store.list_objects("csvs", None, 10).unwrap();
        assert_eq!(all.len(), 3);

        let none = store.list_objects("csvs", Some("missing/"), 1).unwrap();
        assert!(none.is_empty(), "an empty listing is still a success");
    }

    #[test]
    fn test_object_store_failures() {
        let toml = r#"
            [[buckets]]
            name = "locked"
            objects = ["a.csv"]
            deny_list = true
        "#;

        let store = PolicyDocument::from_toml_str(toml).unwrap().object_store();

        match store.list_objects("locked", None, 1) {
            Err(LoadgateError::StorageFailed { reason }) => assert!(reason.contains("AccessDenied")),
            other => panic!("expected StorageFailed, got {:?}", other),
        }
        match store.list_objects("absent", None, 1) {
            Err(LoadgateError::StorageFailed { reason }) => assert!(reason.contains("NoSuchBucket")),
            other => panic!("expected StorageFailed, got {:?}", other),
        }
    }

    // ── 6. config errors ──────────────────────────────────────────────────────

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = PolicyDocument::from_toml_str("[[rules]]\nid = ");
        assert!(matches!(result, Err(LoadgateError::ConfigError { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = PolicyDocument::from_file(std::path::Path::new("/nonexistent/offline.toml"));
        match result {
            Err(LoadgateError::ConfigError { reason }) => {
                assert!(reason.contains("/nonexistent/offline.toml"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
