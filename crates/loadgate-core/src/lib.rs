//! # loadgate-core
//!
//! The synchronous, fail-fast workflow runtime for graph bulk loads.
//!
//! This crate provides:
//! - The collaborator traits (`PermissionSimulator`, `ObjectStore`,
//!   `PipelineStep`, `RunReporter`)
//! - The `WorkflowOrchestrator` that runs them in order
//! - Stock pipeline steps (`PlaceholderStep`, `CommandStep`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use loadgate_core::{Collaborators, WorkflowOrchestrator};
//!
//! let summary = WorkflowOrchestrator::new(config, collaborators).run();
//! ```

pub mod orchestrator;
pub mod steps;
pub mod traits;

pub use orchestrator::{Collaborators, WorkflowOrchestrator};
