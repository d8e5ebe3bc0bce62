//! The run summary returned by the orchestrator.
//!
//! A `RunSummary` is an ordered mapping from `StepName` to `StepReport`. It is
//! created fresh for every run with every step at `{ok: false}`, except the
//! identity step which always starts out ok.

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// The steps of the workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    IdentifyPrincipal,
    CheckGraphPermissions,
    CheckStoragePermissions,
    GenerateInputs,
    BulkLoad,
}

impl StepName {
    /// Every step, in execution order.
    pub const ALL: [StepName; 5] = [
        StepName::IdentifyPrincipal,
        StepName::CheckGraphPermissions,
        StepName::CheckStoragePermissions,
        StepName::GenerateInputs,
        StepName::BulkLoad,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepName::IdentifyPrincipal => "identify_principal",
            StepName::CheckGraphPermissions => "check_graph_permissions",
            StepName::CheckStoragePermissions => "check_storage_permissions",
            StepName::GenerateInputs => "generate_inputs",
            StepName::BulkLoad => "bulk_load",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Echoed principal identity (identity step only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_arn: Option<String>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ok: {}", self.ok)?;
        if let Some(arn) = &self.principal_arn {
            write!(f, ", principal_arn: {arn}")?;
        }
        if let Some(err) = &self.error {
            write!(f, ", error: {err}")?;
        }
        f.write_str("}")
    }
}

/// Ordered per-step results for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    steps: Vec<(StepName, StepReport)>,
}

impl RunSummary {
    /// A fresh summary: identity ok with `principal_arn` echoed, everything
    /// else `{ok: false}`.
    pub fn new(principal_arn: &str) -> Self {
        let steps = StepName::ALL
            .iter()
            .map(|&step| {
                let report = if step == StepName::IdentifyPrincipal {
                    StepReport {
                        ok: true,
                        error: None,
                        principal_arn: Some(principal_arn.to_string()),
                    }
                } else {
                    StepReport::default()
                };
                (step, report)
            })
            .collect();
        Self { steps }
    }

    pub fn get(&self, step: StepName) -> &StepReport {
        // Every StepName is inserted by `new`, so the lookup always hits.
        &self.steps[step as usize].1
    }

    pub fn set_ok(&mut self, step: StepName, ok: bool) {
        self.entry(step).ok = ok;
    }

    pub fn set_error(&mut self, step: StepName, error: impl Into<String>) {
        self.entry(step).error = Some(error.into());
    }

    /// True when every step reports ok.
    pub fn all_ok(&self) -> bool {
        self.steps.iter().all(|(_, r)| r.ok)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StepName, &StepReport)> {
        self.steps.iter().map(|(s, r)| (*s, r))
    }

    fn entry(&mut self, step: StepName) -> &mut StepReport {
        &mut self.steps[step as usize].1
    }
}

impl Serialize for RunSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.steps.len()))?;
        for (step, report) in &self.steps {
            map.serialize_entry(step.as_str(), report)?;
        }
        map.end()
    }
}
