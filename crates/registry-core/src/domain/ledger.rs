//! # Ownership Ledger
//!
//! One append-only sequence of [`TransferRecord`]s per serial number, in
//! insertion (= chronological) order. Sequences are opened empty at
//! registration, which is what lets `history_of` distinguish "registered,
//! never transferred" (empty slice) from "never registered" (no sequence).
//!
//! Nothing here ever removes or reorders an entry (INVARIANT-5).

use crate::domain::entities::TransferRecord;
use crate::domain::value_objects::SerialNumber;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The custody audit log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipLedger {
    histories: BTreeMap<SerialNumber, Vec<TransferRecord>>,
}

impl OwnershipLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an empty history for a newly registered serial number.
    /// Idempotent; an existing history is left untouched.
    pub fn open(&mut self, serial: &SerialNumber) {
        self.histories.entry(serial.clone()).or_default();
    }

    /// Appends one transfer to a serial number's history. Opens the history
    /// if registration somehow did not (append must never lose an entry).
    pub fn append(&mut self, serial: &SerialNumber, entry: TransferRecord) {
        self.histories.entry(serial.clone()).or_default().push(entry);
    }

    /// The history for a serial number, oldest first. None if the serial
    /// number was never registered. Total over all strings.
    #[must_use]
    pub fn history(&self, serial: &str) -> Option<&[TransferRecord]> {
        self.histories.get(serial).map(Vec::as_slice)
    }

    /// Number of transfers recorded for a serial number, if registered.
    #[must_use]
    pub fn transfer_count(&self, serial: &str) -> Option<usize> {
        self.histories.get(serial).map(Vec::len)
    }

    /// Number of opened histories (= registered devices).
    #[must_use]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// True iff no history has been opened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Total transfers across all devices.
    #[must_use]
    pub fn total_transfers(&self) -> usize {
        self.histories.values().map(Vec::len).sum()
    }

    /// Iterates (serial, history) pairs in serial-number order.
    pub fn iter(&self) -> impl Iterator<Item = (&SerialNumber, &[TransferRecord])> {
        self.histories.iter().map(|(s, h)| (s, h.as_slice()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
