//! In-memory, hash-chained `RunReporter`.
//!
//! `JournalReporter` appends every event it receives to a SHA-256 chain.
//! Clones share the same chain, so the caller can hand one clone to the
//! orchestrator and keep another to export or verify the journal after the
//! run.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, warn};

use loadgate_contracts::{
    error::{LoadgateError, LoadgateResult},
    report::{ReportEvent, RunId},
};
use loadgate_core::traits::RunReporter;

use crate::{
    chain::{hash_entry, verify_chain},
    event::{JournalEntry, RunJournal},
};

pub(crate) struct JournalState {
    pub(crate) entries: Vec<JournalEntry>,
    pub(crate) last_hash: String,
}

/// An append-only journal of report events.
#[derive(Clone)]
pub struct JournalReporter {
    pub(crate) state: Arc<Mutex<JournalState>>,
}

impl Default for JournalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalReporter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(JournalState {
                entries: Vec::new(),
                last_hash: JournalEntry::GENESIS_HASH.to_string(),
            })),
        }
    }

    /// Recover the state even if a previous holder panicked; the chain is
    /// only ever extended under the lock, so it is never half-written.
    fn lock(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Events recorded so far, in order.
    pub fn events(&self) -> Vec<ReportEvent> {
        self.lock().entries.iter().map(|e| e.event.clone()).collect()
    }

    /// Export a sealed snapshot of the journal.
    pub fn export(&self) -> RunJournal {
        let state = self.lock();
        RunJournal {
            run_id: state.entries.first().map(|e| e.event.run_id),
            entries: state.entries.clone(),
            sealed_at: Utc::now(),
            terminal_hash: state
                .entries
                .last()
                .map(|e| e.this_hash.clone())
                .unwrap_or_default(),
        }
    }

    /// Verify that the in-memory chain has not been altered.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.lock().entries)
    }

    /// Write the sealed journal to `path` as pretty JSON.
    pub fn write_to(&self, path: &Path) -> LoadgateResult<()> {
        let journal = self.export();
        let json = serde_json::to_string_pretty(&journal).map_err(|e| {
            LoadgateError::JournalWriteFailed {
                reason: format!("cannot serialize journal: {e}"),
            }
        })?;
        fs::write(path, json).map_err(|e| LoadgateError::JournalWriteFailed {
            reason: format!("cannot write '{}': {}", path.display(), e),
        })?;

        info!(
            path = %path.display(),
            entries = journal.entries.len(),
            terminal_hash = %journal.terminal_hash,
            "run journal written"
        );
        Ok(())
    }
}

impl RunReporter for JournalReporter {
    fn record(&self, event: ReportEvent) {
        let mut state = self.lock();

        if let Some(first) = state.entries.first() {
            let expected: RunId = first.event.run_id;
            if event.run_id != expected {
                warn!(
                    expected = %expected,
                    got = %event.run_id,
                    "journal received an event from another run"
                );
            }
        }

        let sequence = state.entries.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(sequence, &event, &prev_hash);

        state.entries.push(JournalEntry {
            sequence,
            event,
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;
    }
}
