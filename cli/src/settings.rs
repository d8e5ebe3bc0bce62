//! TOML settings for the `loadgate` binary.
//!
//! ```toml
//! principal_arn = "arn:aws:iam::123456789012:role/LoadRole"
//! mode = "graph"
//! graph_arn = "arn:aws:neptune-graph:us-east-1:123456789012:graph/g-abcdefgh"
//!
//! [storage]
//! bucket = "csv-bucket"
//! prefix = "neptune/csvs"
//!
//! [pipeline]
//! placeholder_delay_ms = 1000
//! bulk_load = "./scripts/load.sh"
//! ```

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use loadgate_aws::SessionOptions;
use loadgate_contracts::{
    config::AgentConfig,
    error::{LoadgateError, LoadgateResult},
    summary::StepName,
};
use loadgate_core::{
    steps::{CommandStep, PlaceholderStep},
    traits::PipelineStep,
};

fn default_mode() -> String {
    "graph".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub bucket: String,
    pub prefix: Option<String>,
}

/// Commands for the two pluggable steps. A step without a command runs as a
/// placeholder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSettings {
    #[serde(default)]
    pub placeholder_delay_ms: u64,
    pub generate_inputs: Option<String>,
    pub bulk_load: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsSettings {
    pub profile: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub principal_arn: String,
    /// `"graph"` or `"db"`; validated when the agent config is built.
    #[serde(default = "default_mode")]
    pub mode: String,
    pub graph_arn: Option<String>,
    pub storage: StorageSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub aws: AwsSettings,
}

impl Settings {
    pub fn from_toml_str(s: &str) -> LoadgateResult<Self> {
        toml::from_str(s)
            .map_err(|e| LoadgateError::config(format!("failed to parse settings TOML: {e}")))
    }

    pub fn from_file(path: &Path) -> LoadgateResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LoadgateError::config(format!(
                "failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Like [`Settings::from_file`], but a missing file is `Ok(None)`.
    /// Unreadable or malformed files are still errors.
    pub fn from_optional_file(path: &Path) -> LoadgateResult<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoadgateError::config(format!(
                "failed to read settings file '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn agent_config(&self) -> LoadgateResult<AgentConfig> {
        AgentConfig::new(
            self.principal_arn.clone(),
            self.storage.bucket.clone(),
            self.storage.prefix.as_deref(),
            self.graph_arn.clone(),
            &self.mode,
        )
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            profile: self.aws.profile.clone(),
            region: self.aws.region.clone(),
        }
    }

    pub fn generate_inputs_step(&self) -> LoadgateResult<Box<dyn PipelineStep>> {
        self.step(StepName::GenerateInputs, self.pipeline.generate_inputs.as_deref())
    }

    pub fn bulk_load_step(&self) -> LoadgateResult<Box<dyn PipelineStep>> {
        self.step(StepName::BulkLoad, self.pipeline.bulk_load.as_deref())
    }

    fn step(&self, name: StepName, command: Option<&str>) -> LoadgateResult<Box<dyn PipelineStep>> {
        Ok(match command {
            Some(line) => Box::new(CommandStep::new(name.as_str(), line)?),
            None => Box::new(
                PlaceholderStep::new(name.as_str())
                    .with_delay(Duration::from_millis(self.pipeline.placeholder_delay_ms)),
            ),
        })
    }
}
