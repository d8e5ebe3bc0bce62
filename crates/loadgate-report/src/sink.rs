//! Reporters that forward events elsewhere.

use tracing::{error, info, warn};

use loadgate_contracts::report::{EventKind, ReportEvent};
use loadgate_core::traits::RunReporter;

/// Emits each event as a structured `tracing` record.
///
/// Denials, absorbed errors and failed steps log at `error`; warnings and
/// skips at `warn`; everything else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl RunReporter for TracingReporter {
    fn record(&self, event: ReportEvent) {
        let run_id = event.run_id;
        let step = event.step;

        match event.kind {
            EventKind::StepStarted => info!(%run_id, %step, "step started"),
            EventKind::StepPassed => info!(%run_id, %step, "step passed"),
            EventKind::StepFailed { reason } => error!(%run_id, %step, %reason, "step failed"),
            EventKind::StepErrored { error } => error!(%run_id, %step, %error, "step raised"),
            EventKind::Skipped { reason } => warn!(%run_id, %step, %reason, "step skipped"),
            EventKind::Denied { denials } => {
                for denied in &denials {
                    let statements: Vec<&str> = denied
                        .matched_statements
                        .iter()
                        .map(|s| s.source_policy_id.as_str())
                        .collect();
                    error!(
                        %run_id,
                        %step,
                        action = %denied.action,
                        decision = %denied.decision.as_str(),
                        matched = ?statements,
                        "permission simulation denied action"
                    );
                }
            }
            EventKind::Warning { message } => warn!(%run_id, %step, "{message}"),
            EventKind::Error { message } => error!(%run_id, %step, "{message}"),
            EventKind::Info { message } => info!(%run_id, %step, "{message}"),
        }
    }
}

/// Forwards every event to each inner reporter, in order.
#[derive(Default)]
pub struct FanoutReporter {
    sinks: Vec<Box<dyn RunReporter>>,
}

impl FanoutReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl RunReporter + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl RunReporter for FanoutReporter {
    fn record(&self, event: ReportEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.record(event.clone());
            }
            last.record(event);
        }
    }
}
