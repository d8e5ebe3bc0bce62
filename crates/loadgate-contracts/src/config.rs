//! Agent configuration and the action sets derived from it.
//!
//! `AgentConfig` is validated once, at construction, and is immutable
//! afterwards. Nothing here talks to AWS: a config can be built and rejected
//! before any session or client exists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LoadgateError, LoadgateResult};

/// Which Neptune permission namespace to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    /// Neptune Analytics (`neptune-graph:` actions).
    Graph,
    /// Classic Neptune database clusters (`neptune-db:` actions).
    Db,
}

impl GraphMode {
    /// The IAM service prefix for this mode.
    pub fn action_namespace(self) -> &'static str {
        match self {
            GraphMode::Graph => "neptune-graph",
            GraphMode::Db => "neptune-db",
        }
    }
}

impl FromStr for GraphMode {
    type Err = LoadgateError;

    fn from_str(s: &str) -> LoadgateResult<Self> {
        match s {
            "graph" => Ok(GraphMode::Graph),
            "db" => Ok(GraphMode::Db),
            other => Err(LoadgateError::config(format!(
                "mode must be 'graph' or 'db', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphMode::Graph => f.write_str("graph"),
            GraphMode::Db => f.write_str("db"),
        }
    }
}

/// The fully-qualified IAM action names a bulk load depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    /// Query actions against the graph store.
    pub graph: Vec<String>,
    /// Read actions against the staging bucket.
    pub storage: Vec<String>,
}

impl ActionSet {
    /// Build the action set for `mode`.
    pub fn for_mode(mode: GraphMode) -> Self {
        let ns = mode.action_namespace();
        Self {
            graph: ["ReadDataViaQuery", "WriteDataViaQuery", "DeleteDataViaQuery"]
                .iter()
                .map(|a| format!("{ns}:{a}"))
                .collect(),
            storage: vec!["s3:GetObject".to_string(), "s3:ListBucket".to_string()],
        }
    }
}

/// Resource scope used when no graph ARN is configured.
pub const WILDCARD_RESOURCE: &str = "*";

/// Immutable configuration for one orchestrator instance.
#[derive(Debug, Clone, Serialize)]
pub struct AgentConfig {
    principal_arn: String,
    bucket: String,
    prefix: Option<String>,
    graph_arn: Option<String>,
    mode: GraphMode,
    actions: ActionSet,
}

impl AgentConfig {
    /// Validate inputs and build a config.
    ///
    /// `mode` is parsed here so that an unrecognized value is rejected before
    /// the caller creates any collaborator. `prefix` is stripped of leading
    /// and trailing `/`; an empty result means "no prefix".
    ///
    /// # Errors
    ///
    /// `LoadgateError::ConfigError` for an unknown mode, an empty principal,
    /// or an empty bucket.
    pub fn new(
        principal_arn: impl Into<String>,
        bucket: impl Into<String>,
        prefix: Option<&str>,
        graph_arn: Option<String>,
        mode: &str,
    ) -> LoadgateResult<Self> {
        let mode: GraphMode = mode.parse()?;

        let principal_arn = principal_arn.into();
        if principal_arn.trim().is_empty() {
            return Err(LoadgateError::config("principal ARN must not be empty"));
        }

        let bucket = bucket.into();
        if bucket.trim().is_empty() {
            return Err(LoadgateError::config("bucket name must not be empty"));
        }

        let prefix = prefix
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let graph_arn = graph_arn.filter(|a| !a.trim().is_empty());

        Ok(Self {
            principal_arn,
            bucket,
            prefix,
            graph_arn,
            mode,
            actions: ActionSet::for_mode(mode),
        })
    }

    pub fn principal_arn(&self) -> &str {
        &self.principal_arn
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The normalized key prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn graph_arn(&self) -> Option<&str> {
        self.graph_arn.as_deref()
    }

    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    /// Resource scope for the graph simulation: the configured graph ARN, or
    /// the wildcard when none is set. Never both.
    pub fn graph_resources(&self) -> Vec<String> {
        match &self.graph_arn {
            Some(arn) => vec![arn.clone()],
            None => vec![WILDCARD_RESOURCE.to_string()],
        }
    }

    /// ARN of the staging bucket itself.
    pub fn bucket_arn(&self) -> String {
        format!("arn:aws:s3:::{}", self.bucket)
    }

    /// ARN pattern covering the objects under the configured prefix.
    pub fn object_arn(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("arn:aws:s3:::{}/{}/*", self.bucket, prefix),
            None => format!("arn:aws:s3:::{}/*", self.bucket),
        }
    }

    /// Resource scope for the storage simulation: bucket, then objects.
    pub fn storage_resources(&self) -> Vec<String> {
        vec![self.bucket_arn(), self.object_arn()]
    }
}
