//! Hash-chain primitives for the run journal.
//!
//! Hash input layout (bytes, in order):
//!   1. run id as its hyphenated UUID string
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the event

use sha2::{Digest, Sha256};

use loadgate_contracts::report::ReportEvent;

use crate::event::JournalEntry;

/// Compute the lowercase hex SHA-256 for one journal entry.
///
/// # Panics
///
/// Panics if `event` cannot be serialized to JSON, which cannot happen for
/// `ReportEvent`: every field is a plain string, number, or list of them.
pub fn hash_entry(sequence: u64, event: &ReportEvent, prev_hash: &str) -> String {
    let event_json =
        serde_json::to_vec(event).expect("ReportEvent must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(event.run_id.0.to_string().as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&event_json);

    hex::encode(hasher.finalize())
}

/// Verify prev-hash linkage, sequence numbering and every stored hash.
///
/// An empty chain is valid.
pub fn verify_chain(entries: &[JournalEntry]) -> bool {
    let mut expected_prev = JournalEntry::GENESIS_HASH.to_string();

    for (idx, entry) in entries.iter().enumerate() {
        if entry.sequence != idx as u64 || entry.prev_hash != expected_prev {
            return false;
        }
        if entry.this_hash != hash_entry(entry.sequence, &entry.event, &entry.prev_hash) {
            return false;
        }
        expected_prev = entry.this_hash.clone();
    }

    true
}
