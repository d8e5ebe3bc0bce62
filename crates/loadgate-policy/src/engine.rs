//! Offline collaborators backed by a TOML policy document.
//!
//! `StaticSimulator` implements `PermissionSimulator` and `StaticObjectStore`
//! implements `ObjectStore`, so a full run can be rehearsed without AWS.
//!
//! Evaluation algorithm, per action:
//!
//! 1. For each requested resource, find the first rule matching
//!    (principal, action, resource). No match → `implicitDeny`.
//! 2. Combine the per-resource decisions: any `explicitDeny` wins, then any
//!    other non-allowed decision, otherwise `allowed`.
//! 3. The ids of the rules behind the combined decision become its matched
//!    statements.

use std::path::Path;

use tracing::{debug, warn};

use loadgate_contracts::{
    error::{LoadgateError, LoadgateResult},
    simulation::{Decision, EvaluationResult, MatchedStatement},
    storage::ObjectSummary,
};
use loadgate_core::traits::{ObjectStore, PermissionSimulator};

use crate::rule::{BucketFixture, PolicyDocument, SimulationRule};

impl PolicyDocument {
    /// Parse `s` as TOML.
    ///
    /// Returns `LoadgateError::ConfigError` if the TOML is malformed or does
    /// not match the expected schema.
    pub fn from_toml_str(s: &str) -> LoadgateResult<Self> {
        toml::from_str(s)
            .map_err(|e| LoadgateError::config(format!("failed to parse policy TOML: {e}")))
    }

    /// Read the file at `path` and parse it as a policy document.
    pub fn from_file(path: &Path) -> LoadgateResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LoadgateError::config(format!(
                "failed to read policy file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn simulator(&self) -> StaticSimulator {
        StaticSimulator::new(self.rules.clone())
    }

    pub fn object_store(&self) -> StaticObjectStore {
        StaticObjectStore::new(self.buckets.clone())
    }
}

/// A `PermissionSimulator` that evaluates an ordered rule list.
#[derive(Debug, Clone)]
pub struct StaticSimulator {
    rules: Vec<SimulationRule>,
}

impl StaticSimulator {
    pub fn new(rules: Vec<SimulationRule>) -> Self {
        Self { rules }
    }

    fn decide(&self, principal: &str, action: &str, resource: &str) -> (Decision, Option<&str>) {
        match self
            .rules
            .iter()
            .find(|r| r.matches(principal, action, resource))
        {
            Some(rule) => {
                debug!(rule_id = %rule.id, action, resource, decision = %rule.decision, "rule matched");
                (Decision::new(rule.decision.clone()), Some(rule.id.as_str()))
            }
            None => (Decision::implicit_deny(), None),
        }
    }
}

impl PermissionSimulator for StaticSimulator {
    fn simulate(
        &self,
        principal_arn: &str,
        actions: &[String],
        resources: &[String],
    ) -> LoadgateResult<Vec<EvaluationResult>> {
        if resources.is_empty() {
            return Err(LoadgateError::SimulationFailed {
                reason: "at least one resource is required".to_string(),
            });
        }

        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            let decided: Vec<(Decision, Option<&str>)> = resources
                .iter()
                .map(|resource| self.decide(principal_arn, action, resource))
                .collect();

            let combined = decided
                .iter()
                .find(|(d, _)| d.as_str() == Decision::EXPLICIT_DENY)
                .or_else(|| decided.iter().find(|(d, _)| !d.is_allowed()))
                .map(|(d, _)| d.clone())
                .unwrap_or_else(Decision::allowed);

            let matched_statements = decided
                .iter()
                .filter(|(d, _)| *d == combined)
                .filter_map(|(_, rule_id)| *rule_id)
                .map(|rule_id| MatchedStatement {
                    source_policy_id: rule_id.to_string(),
                    source_policy_type: Some("offline".to_string()),
                })
                .collect();

            results.push(EvaluationResult {
                action: action.clone(),
                decision: combined,
                matched_statements,
            });
        }
        Ok(results)
    }
}

/// An `ObjectStore` serving listings from bucket fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticObjectStore {
    buckets: Vec<BucketFixture>,
}

impl StaticObjectStore {
    pub fn new(buckets: Vec<BucketFixture>) -> Self {
        Self { buckets }
    }
}

impl ObjectStore for StaticObjectStore {
    fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        max_results: i32,
    ) -> LoadgateResult<Vec<ObjectSummary>> {
        let fixture = self
            .buckets
            .iter()
            .find(|b| b.name == bucket)
            .ok_or_else(|| LoadgateError::StorageFailed {
                reason: format!("NoSuchBucket: the specified bucket '{bucket}' does not exist"),
            })?;

        if fixture.deny_list {
            warn!(bucket, "offline bucket refuses listing");
            return Err(LoadgateError::StorageFailed {
                reason: format!("AccessDenied: listing of bucket '{bucket}' is denied"),
            });
        }

        let limit = usize::try_from(max_results).unwrap_or(0);
        Ok(fixture
            .objects
            .iter()
            .filter(|key| prefix.map_or(true, |p| key.starts_with(p)))
            .take(limit)
            .map(ObjectSummary::new)
            .collect())
    }
}
