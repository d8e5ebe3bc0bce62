//! Collaborator trait definitions for the loadgate workflow.
//!
//! The orchestrator talks to the outside world only through these seams:
//!
//! - `PermissionSimulator`: IAM policy dry-run
//! - `ObjectStore`: live listing of the staging bucket
//! - `PipelineStep`: input generation and bulk load
//! - `RunReporter`: structured event sink
//!
//! All of them are created by the caller and handed to the orchestrator, so
//! tests can substitute deterministic fakes.

use loadgate_contracts::{
    error::LoadgateResult,
    report::ReportEvent,
    simulation::EvaluationResult,
    storage::ObjectSummary,
};

/// Evaluates whether a principal's policies would permit actions on resources.
pub trait PermissionSimulator: Send + Sync {
    /// Simulate `actions` for `principal_arn` against `resources`.
    ///
    /// Returns one result per action. Transport or authorization problems with
    /// the simulation call itself are `LoadgateError::SimulationFailed`.
    fn simulate(
        &self,
        principal_arn: &str,
        actions: &[String],
        resources: &[String],
    ) -> LoadgateResult<Vec<EvaluationResult>>;
}

/// Lists objects in a bucket.
pub trait ObjectStore: Send + Sync {
    /// List at most `max_results` objects under `prefix`.
    ///
    /// An empty listing is a success. Failures are
    /// `LoadgateError::StorageFailed`.
    fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        max_results: i32,
    ) -> LoadgateResult<Vec<ObjectSummary>>;
}

/// An opaque unit of work in the pipeline.
///
/// `Ok(true)` is success, `Ok(false)` is an ordinary failure, and `Err` means
/// the step could not be carried out at all.
pub trait PipelineStep: Send + Sync {
    fn name(&self) -> &str;

    fn execute(&self) -> LoadgateResult<bool>;
}

/// Receives every event the orchestrator emits during a run.
///
/// Recording must not fail the run; sinks swallow their own errors.
pub trait RunReporter: Send + Sync {
    fn record(&self, event: ReportEvent);
}
