//! Collaborator wiring for the CLI.
//!
//! The agent config is validated before any collaborator is created, so a
//! bad mode never opens an AWS session.

use loadgate_aws::AwsSession;
use loadgate_contracts::{error::LoadgateResult, summary::StepName};
use loadgate_core::{
    steps::PlaceholderStep,
    traits::{ObjectStore, PermissionSimulator, RunReporter},
    Collaborators, WorkflowOrchestrator,
};
use loadgate_policy::PolicyDocument;

use crate::settings::Settings;

/// Where permission decisions and listings come from.
pub enum Backend {
    Aws(AwsSession),
    Offline(PolicyDocument),
}

impl Backend {
    fn simulator(&self) -> Box<dyn PermissionSimulator> {
        match self {
            Backend::Aws(session) => Box::new(session.simulator()),
            Backend::Offline(doc) => Box::new(doc.simulator()),
        }
    }

    fn object_store(&self) -> Box<dyn ObjectStore> {
        match self {
            Backend::Aws(session) => Box::new(session.object_store()),
            Backend::Offline(doc) => Box::new(doc.object_store()),
        }
    }
}

/// Build an orchestrator from settings. `connect` is only called once the
/// config has validated.
pub fn build_orchestrator(
    settings: &Settings,
    connect: impl FnOnce(&Settings) -> LoadgateResult<Backend>,
    reporter: Box<dyn RunReporter>,
) -> LoadgateResult<WorkflowOrchestrator> {
    let config = settings.agent_config()?;
    let generate_inputs = settings.generate_inputs_step()?;
    let bulk_load = settings.bulk_load_step()?;

    let backend = connect(settings)?;

    Ok(WorkflowOrchestrator::new(
        config,
        Collaborators {
            simulator: backend.simulator(),
            store: backend.object_store(),
            generate_inputs,
            bulk_load,
            reporter,
        },
    ))
}

/// Build an orchestrator for the single-check subcommands. The pipeline
/// commands are never run there, so they are neither parsed nor validated.
pub fn build_checker(
    settings: &Settings,
    connect: impl FnOnce(&Settings) -> LoadgateResult<Backend>,
    reporter: Box<dyn RunReporter>,
) -> LoadgateResult<WorkflowOrchestrator> {
    let config = settings.agent_config()?;
    let backend = connect(settings)?;

    Ok(WorkflowOrchestrator::new(
        config,
        Collaborators {
            simulator: backend.simulator(),
            store: backend.object_store(),
            generate_inputs: Box::new(PlaceholderStep::new(StepName::GenerateInputs.as_str())),
            bulk_load: Box::new(PlaceholderStep::new(StepName::BulkLoad.as_str())),
            reporter,
        },
    ))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use loadgate_contracts::{error::LoadgateError, summary::StepName};
    use loadgate_policy::PolicyDocument;
    use loadgate_report::{JournalReporter, TracingReporter};

    use super::{build_checker, build_orchestrator, Backend};
    use crate::settings::Settings;

    const EXAMPLE_SETTINGS: &str = include_str!("../../loadgate.example.toml");
    const EXAMPLE_POLICY: &str = include_str!("../../policies/offline.example.toml");

    fn offline(_: &Settings) -> Result<Backend, LoadgateError> {
        Ok(Backend::Offline(
            PolicyDocument::from_toml_str(EXAMPLE_POLICY).unwrap(),
        ))
    }

    fn settings_without_commands() -> Settings {
        let mut settings = Settings::from_toml_str(EXAMPLE_SETTINGS).unwrap();
        settings.pipeline.generate_inputs = None;
        settings.pipeline.bulk_load = None;
        settings.pipeline.placeholder_delay_ms = 0;
        settings
    }

    #[test]
    fn test_offline_example_run_succeeds() {
        let journal = JournalReporter::new();
        let orchestrator =
            build_orchestrator(&settings_without_commands(), offline, Box::new(journal.clone()))
                .unwrap();

        let summary = orchestrator.run();
        assert!(summary.all_ok(), "example policy should allow the example settings: {summary:?}");
        assert!(journal.verify_integrity());
        assert!(!journal.events().is_empty());
    }

    #[test]
    fn test_offline_db_mode_is_denied_by_example_policy() {
        let mut settings = settings_without_commands();
        settings.mode = "db".to_string();

        let summary = build_orchestrator(&settings, offline, Box::new(TracingReporter))
            .unwrap()
            .run();

        assert!(!summary.get(StepName::CheckGraphPermissions).ok);
        assert!(summary.get(StepName::CheckStoragePermissions).ok);
        assert!(!summary.get(StepName::BulkLoad).ok);
        assert!(summary.get(StepName::BulkLoad).error.is_none());
    }

    #[test]
    fn test_checker_ignores_pipeline_commands() {
        let mut settings = settings_without_commands();
        settings.pipeline.bulk_load = Some("load 'unterminated".to_string());

        assert!(matches!(
            build_orchestrator(&settings, offline, Box::new(TracingReporter)),
            Err(LoadgateError::ConfigError { .. })
        ));

        let checker = build_checker(&settings, offline, Box::new(TracingReporter)).unwrap();
        assert!(checker.check_graph_permissions().unwrap());
        assert!(checker.check_storage_permissions().unwrap());
    }

    #[test]
    fn test_checker_still_validates_config() {
        let mut settings = settings_without_commands();
        settings.mode = "cluster".to_string();

        let connected = Cell::new(false);
        let result = build_checker(
            &settings,
            |s| {
                connected.set(true);
                offline(s)
            },
            Box::new(TracingReporter),
        );

        assert!(matches!(result, Err(LoadgateError::ConfigError { .. })));
        assert!(!connected.get());
    }

    #[test]
    fn test_invalid_mode_never_connects() {
        let mut settings = settings_without_commands();
        settings.mode = "cluster".to_string();

        let connected = Cell::new(false);
        let result = build_orchestrator(
            &settings,
            |s| {
                connected.set(true);
                offline(s)
            },
            Box::new(TracingReporter),
        );

        assert!(matches!(result, Err(LoadgateError::ConfigError { .. })));
        assert!(!connected.get(), "no backend may be created for an invalid config");
    }
}
