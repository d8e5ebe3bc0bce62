//! # loadgate-report
//!
//! Reporting sinks for the loadgate orchestrator.
//!
//! ## Overview
//!
//! The orchestrator never logs globally; it hands every event to an injected
//! `RunReporter`. This crate provides:
//!
//! - `TracingReporter`: structured `tracing` output
//! - `JournalReporter`: append-only, SHA-256 hash-chained capture that can
//!   be exported, verified, or written to disk
//! - `FanoutReporter`: sends each event to several sinks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use loadgate_report::{FanoutReporter, JournalReporter, TracingReporter};
//!
//! let journal = JournalReporter::new();
//! let reporter = FanoutReporter::new().with(TracingReporter).with(journal.clone());
//! // ... run the orchestrator with `reporter` ...
//! assert!(journal.verify_integrity());
//! ```

pub mod chain;
pub mod event;
pub mod journal;
pub mod sink;

pub use chain::{hash_entry, verify_chain};
pub use event::{JournalEntry, RunJournal};
pub use journal::JournalReporter;
pub use sink::{FanoutReporter, TracingReporter};

// ── Tests ─────────────────────────────────────────────────────────────────────
