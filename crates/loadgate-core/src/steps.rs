//! Ready-made `PipelineStep` implementations.
//!
//! - `PlaceholderStep` logs, optionally waits, and reports success. It stands
//!   in for input generation and bulk load until an integrator supplies a
//!   real step.
//! - `CommandStep` runs an external command line; exit status 0 is success.

use std::process::Command;
use std::time::Duration;

use tracing::{info, warn};

use loadgate_contracts::error::{LoadgateError, LoadgateResult};

use crate::traits::PipelineStep;

/// A step that does nothing but log and succeed.
#[derive(Debug, Clone)]
pub struct PlaceholderStep {
    name: String,
    delay: Duration,
}

impl PlaceholderStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delay: Duration::ZERO,
        }
    }

    /// Sleep for `delay` before reporting success.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl PipelineStep for PlaceholderStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self) -> LoadgateResult<bool> {
        info!(step = %self.name, "running placeholder step; replace with a real implementation");
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        info!(step = %self.name, "placeholder step reported success");
        Ok(true)
    }
}

/// A step that runs an external program.
///
/// The command line is split with shell quoting rules but is not passed to a
/// shell, so pipes and redirects are not interpreted.
#[derive(Debug, Clone)]
pub struct CommandStep {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandStep {
    /// Parse `command_line` into a program and its arguments.
    ///
    /// # Errors
    ///
    /// `LoadgateError::ConfigError` if the line has unbalanced quotes or is
    /// empty.
    pub fn new(name: impl Into<String>, command_line: &str) -> LoadgateResult<Self> {
        let name = name.into();
        let mut words = shell_words::split(command_line).map_err(|e| {
            LoadgateError::config(format!("cannot parse command for step '{name}': {e}"))
        })?;
        if words.is_empty() {
            return Err(LoadgateError::config(format!(
                "command for step '{name}' is empty"
            )));
        }
        let program = words.remove(0);
        Ok(Self {
            name,
            program,
            args: words,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl PipelineStep for CommandStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self) -> LoadgateResult<bool> {
        info!(step = %self.name, program = %self.program, args = ?self.args, "running command step");

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| LoadgateError::StepFailed {
                step: self.name.clone(),
                reason: format!("failed to spawn '{}': {}", self.program, e),
            })?;

        if status.success() {
            info!(step = %self.name, "command step succeeded");
            Ok(true)
        } else {
            warn!(step = %self.name, status = %status, "command step exited unsuccessfully");
            Ok(false)
        }
    }
}
