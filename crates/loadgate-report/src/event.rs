//! Journal entry and sealed journal types.
//!
//! `JournalEntry` wraps one `ReportEvent` with its position in the chain and
//! the SHA-256 hashes linking it to its predecessor. `RunJournal` is the
//! sealed export for one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loadgate_contracts::report::{ReportEvent, RunId};

/// A single link in a run's hash chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    pub event: ReportEvent,

    /// `this_hash` of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// SHA-256 (hex) over run id, sequence, `prev_hash` and the event JSON.
    pub this_hash: String,
}

impl JournalEntry {
    /// The `prev_hash` of the first entry in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A sealed journal for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunJournal {
    pub run_id: Option<RunId>,
    pub entries: Vec<JournalEntry>,
    pub sealed_at: DateTime<Utc>,
    /// `this_hash` of the last entry; empty if the journal is empty.
    pub terminal_hash: String,
}
