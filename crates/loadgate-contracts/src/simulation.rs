//! Permission-simulation result types.
//!
//! The simulator returns one `EvaluationResult` per action. The decision is
//! treated as an opaque string: the runtime only ever asks whether it equals
//! `allowed`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// An IAM evaluation decision (`allowed`, `implicitDeny`, `explicitDeny`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decision(pub String);

impl Decision {
    pub const ALLOWED: &'static str = "allowed";
    pub const IMPLICIT_DENY: &'static str = "implicitDeny";
    pub const EXPLICIT_DENY: &'static str = "explicitDeny";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn allowed() -> Self {
        Self::new(Self::ALLOWED)
    }

    pub fn implicit_deny() -> Self {
        Self::new(Self::IMPLICIT_DENY)
    }

    pub fn explicit_deny() -> Self {
        Self::new(Self::EXPLICIT_DENY)
    }

    pub fn is_allowed(&self) -> bool {
        self.0 == Self::ALLOWED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A policy statement that contributed to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedStatement {
    /// Identifier of the source policy (policy name, ARN, or rule id).
    pub source_policy_id: String,
    /// Kind of source policy (`user`, `group`, `role`, `resource`, ...).
    pub source_policy_type: Option<String>,
}

/// One per-action record returned by a simulation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub action: String,
    pub decision: Decision,
    #[serde(default)]
    pub matched_statements: Vec<MatchedStatement>,
}

impl EvaluationResult {
    pub fn new(action: impl Into<String>, decision: Decision) -> Self {
        Self {
            action: action.into(),
            decision,
            matched_statements: Vec::new(),
        }
    }
}

/// A non-allowed action collected from a simulation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeniedAction {
    pub action: String,
    pub decision: Decision,
    pub matched_statements: Vec<MatchedStatement>,
}

/// Collect every non-allowed result, keeping only the first record per action.
pub fn collect_denials(results: &[EvaluationResult]) -> Vec<DeniedAction> {
    let mut seen = HashSet::new();
    results
        .iter()
        .filter(|r| !r.decision.is_allowed())
        .filter(|r| seen.insert(r.action.as_str()))
        .map(|r| DeniedAction {
            action: r.action.clone(),
            decision: r.decision.clone(),
            matched_statements: r.matched_statements.clone(),
        })
        .collect()
}
