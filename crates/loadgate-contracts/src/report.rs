//! Report events emitted by the orchestrator to its injected reporter.
//!
//! Events describe what happened during a run; the `RunSummary` describes
//! where the run ended. Sinks decide what to do with events (log them,
//! journal them, or both).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{simulation::DeniedAction, summary::StepName};

/// Unique identifier for a single orchestrator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub uuid::Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    StepStarted,
    StepPassed,
    /// The step completed but reported failure.
    StepFailed { reason: String },
    /// A collaborator raised; the run stops here.
    StepErrored { error: String },
    /// A step was not attempted.
    Skipped { reason: String },
    /// Policy simulation returned non-allowed decisions.
    Denied { denials: Vec<DeniedAction> },
    Warning { message: String },
    /// A failure that the step absorbed into a `false` result.
    Error { message: String },
    Info { message: String },
}

/// One event in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEvent {
    pub run_id: RunId,
    pub step: StepName,
    #[serde(flatten)]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl ReportEvent {
    pub fn now(run_id: RunId, step: StepName, kind: EventKind) -> Self {
        Self {
            run_id,
            step,
            kind,
            timestamp: Utc::now(),
        }
    }
}
