//! The workflow orchestrator: a fail-fast, check-then-act pipeline.
//!
//!   Identify → GraphPermCheck → StoragePermCheck → GenerateInputs
//!            → [GraphPermGate] → BulkLoad → Done
//!
//! Any failure or collaborator error jumps straight to `Done` with a partial
//! summary. There is no retry and no rollback. The bulk loader is only
//! reachable if the recorded graph-permission result is ok.

use tracing::debug;

use loadgate_contracts::{
    config::AgentConfig,
    error::{LoadgateError, LoadgateResult},
    report::{EventKind, ReportEvent, RunId},
    simulation::{collect_denials, EvaluationResult},
    summary::{RunSummary, StepName},
};

use crate::traits::{ObjectStore, PermissionSimulator, PipelineStep, RunReporter};

/// Everything the orchestrator calls out to, created by the caller.
pub struct Collaborators {
    pub simulator: Box<dyn PermissionSimulator>,
    pub store: Box<dyn ObjectStore>,
    pub generate_inputs: Box<dyn PipelineStep>,
    pub bulk_load: Box<dyn PipelineStep>,
    pub reporter: Box<dyn RunReporter>,
}

/// Drives one pre-flight + load run.
///
/// Construct one orchestrator per run: the `RunId` stamped on every report
/// event is fixed at construction.
pub struct WorkflowOrchestrator {
    config: AgentConfig,
    simulator: Box<dyn PermissionSimulator>,
    store: Box<dyn ObjectStore>,
    generate_inputs: Box<dyn PipelineStep>,
    bulk_load: Box<dyn PipelineStep>,
    reporter: Box<dyn RunReporter>,
    run_id: RunId,
}

impl WorkflowOrchestrator {
    pub fn new(config: AgentConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            simulator: collaborators.simulator,
            store: collaborators.store,
            generate_inputs: collaborators.generate_inputs,
            bulk_load: collaborators.bulk_load,
            reporter: collaborators.reporter,
            run_id: RunId::new(),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Simulate the graph query actions against the graph ARN (or `*`).
    ///
    /// Returns `Ok(true)` iff every decision is `allowed`. Simulation errors
    /// propagate to the caller.
    pub fn check_graph_permissions(&self) -> LoadgateResult<bool> {
        let step = StepName::CheckGraphPermissions;

        if self.config.graph_arn().is_none() {
            self.emit(
                step,
                EventKind::Warning {
                    message: "no graph ARN configured; simulating against '*', a looser check \
                              suited to cluster deployments"
                        .to_string(),
                },
            );
        }

        let resources = self.config.graph_resources();
        let results = self.simulate(&self.config.actions().graph, &resources)?;

        if !self.all_allowed(step, &results) {
            return Ok(false);
        }

        self.emit(
            step,
            EventKind::Info {
                message: "graph permission simulation ok, all required actions allowed".to_string(),
            },
        );
        Ok(true)
    }

    /// Simulate the storage read actions against the bucket and the object
    /// prefix, then probe the bucket with a one-object listing.
    ///
    /// Unlike the graph check, a failed simulation call is reported and turned
    /// into `Ok(false)` here. A failed listing is handled the same way, which
    /// catches bucket policies and KMS key restrictions that simulation
    /// cannot see.
    pub fn check_storage_permissions(&self) -> LoadgateResult<bool> {
        let step = StepName::CheckStoragePermissions;
        let resources = self.config.storage_resources();

        let results = match self.simulate(&self.config.actions().storage, &resources) {
            Ok(results) => results,
            Err(err @ LoadgateError::SimulationFailed { .. }) => {
                self.emit(step, EventKind::Error { message: err.to_string() });
                return Ok(false);
            }
            Err(other) => return Err(other),
        };

        if !self.all_allowed(step, &results) {
            return Ok(false);
        }

        debug!(
            run_id = %self.run_id,
            bucket = %self.config.bucket(),
            prefix = ?self.config.prefix(),
            "probing bucket with a live listing"
        );

        match self.store.list_objects(self.config.bucket(), self.config.prefix(), 1) {
            Ok(objects) => {
                self.emit(
                    step,
                    EventKind::Info {
                        message: format!(
                            "bucket listing ok ({} object(s) visible under s3://{}/{})",
                            objects.len(),
                            self.config.bucket(),
                            self.config.prefix().unwrap_or_default()
                        ),
                    },
                );
                Ok(true)
            }
            Err(err @ LoadgateError::StorageFailed { .. }) => {
                self.emit(step, EventKind::Error { message: err.to_string() });
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }

    /// Run the injected input-generation step.
    pub fn generate_inputs(&self) -> LoadgateResult<bool> {
        self.execute_step(StepName::GenerateInputs, self.generate_inputs.as_ref())
    }

    /// Run the injected bulk-load step.
    pub fn execute_bulk_load(&self) -> LoadgateResult<bool> {
        self.execute_step(StepName::BulkLoad, self.bulk_load.as_ref())
    }

    /// Execute the full workflow and return the summary.
    ///
    /// Never returns an error: collaborator errors are stringified into the
    /// `error` field of the step that raised them, and the run stops there.
    /// A `false` graph result does not stop the run immediately; it is
    /// enforced by the gate in front of the bulk load, which leaves the
    /// `bulk_load` entry at its default.
    pub fn run(&self) -> RunSummary {
        let mut summary = RunSummary::new(self.config.principal_arn());

        self.emit(
            StepName::IdentifyPrincipal,
            EventKind::Info {
                message: format!("principal {}", self.config.principal_arn()),
            },
        );
        self.emit(StepName::IdentifyPrincipal, EventKind::StepPassed);

        // ── Graph permissions ────────────────────────────────────────────────
        let step = StepName::CheckGraphPermissions;
        self.emit(step, EventKind::StepStarted);
        match self.check_graph_permissions() {
            Ok(ok) => {
                summary.set_ok(step, ok);
                self.conclude(step, ok, "graph permission simulation denied required actions");
            }
            Err(err) => return self.abort(summary, step, err),
        }

        // ── Storage permissions ──────────────────────────────────────────────
        let step = StepName::CheckStoragePermissions;
        self.emit(step, EventKind::StepStarted);
        match self.check_storage_permissions() {
            Ok(ok) => {
                summary.set_ok(step, ok);
                self.conclude(
                    step,
                    ok,
                    "storage permission check failed; aborting before input generation",
                );
                if !ok {
                    return summary;
                }
            }
            Err(err) => return self.abort(summary, step, err),
        }

        // ── Input generation ─────────────────────────────────────────────────
        let step = StepName::GenerateInputs;
        self.emit(step, EventKind::StepStarted);
        match self.generate_inputs() {
            Ok(ok) => {
                summary.set_ok(step, ok);
                self.conclude(step, ok, "input generation failed; aborting");
                if !ok {
                    return summary;
                }
            }
            Err(err) => return self.abort(summary, step, err),
        }

        // ── Graph permission gate ────────────────────────────────────────────
        let step = StepName::BulkLoad;
        if !summary.get(StepName::CheckGraphPermissions).ok {
            self.emit(
                step,
                EventKind::Skipped {
                    reason: "graph permissions insufficient; bulk load not attempted".to_string(),
                },
            );
            return summary;
        }

        // ── Bulk load ────────────────────────────────────────────────────────
        self.emit(step, EventKind::StepStarted);
        match self.execute_bulk_load() {
            Ok(ok) => {
                summary.set_ok(step, ok);
                self.conclude(step, ok, "bulk load failed");
                if ok {
                    self.emit(
                        step,
                        EventKind::Info {
                            message: "workflow completed successfully".to_string(),
                        },
                    );
                }
            }
            Err(err) => return self.abort(summary, step, err),
        }

        summary
    }

    fn simulate(
        &self,
        actions: &[String],
        resources: &[String],
    ) -> LoadgateResult<Vec<EvaluationResult>> {
        debug!(
            run_id = %self.run_id,
            principal = %self.config.principal_arn(),
            actions = ?actions,
            resources = ?resources,
            "simulating permissions"
        );
        self.simulator
            .simulate(self.config.principal_arn(), actions, resources)
    }

    /// Report any denials; true when there are none.
    fn all_allowed(&self, step: StepName, results: &[EvaluationResult]) -> bool {
        let denials = collect_denials(results);
        if denials.is_empty() {
            return true;
        }
        self.emit(step, EventKind::Denied { denials });
        false
    }

    fn execute_step(&self, step: StepName, runner: &dyn PipelineStep) -> LoadgateResult<bool> {
        debug!(run_id = %self.run_id, step = %step, runner = runner.name(), "executing pipeline step");
        runner.execute()
    }

    fn conclude(&self, step: StepName, ok: bool, failure_reason: &str) {
        let kind = if ok {
            EventKind::StepPassed
        } else {
            EventKind::StepFailed {
                reason: failure_reason.to_string(),
            }
        };
        self.emit(step, kind);
    }

    fn abort(&self, mut summary: RunSummary, step: StepName, err: LoadgateError) -> RunSummary {
        let error = err.to_string();
        summary.set_error(step, error.clone());
        self.emit(step, EventKind::StepErrored { error });
        summary
    }

    fn emit(&self, step: StepName, kind: EventKind) {
        self.reporter.record(ReportEvent::now(self.run_id, step, kind));
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
