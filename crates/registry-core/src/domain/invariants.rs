//! # Domain Invariants
//!
//! Critical invariants that MUST hold for any registry state. The operations
//! in [`RegistryState`](crate::domain::state::RegistryState) enforce them at
//! mutation time; the checks here let hosts and tests audit a state (or a
//! before/after pair of snapshots) independently.
//!
//! - INVARIANT-1 (Serial Uniqueness): one record per serial number, forever
//! - INVARIANT-2 (Authorized Registration): records come from known registrants
//! - INVARIANT-3 (Owner Derivation): `current_owner` follows the history
//! - INVARIANT-4 (Owner-Only Transfer): custody chains are continuous
//! - INVARIANT-5 (Append-Only History): histories only grow, never reorder
//! - INVARIANT-6 (Admin-Only Authorization): the admin identity is stable

use crate::domain::state::RegistryState;
use crate::domain::value_objects::Identity;

// =============================================================================
// SINGLE-STATE CHECKS
// =============================================================================

/// INVARIANT-1: Serial Uniqueness
///
/// Every record sits under its own serial number and has exactly one opened
/// history; no history exists without a record. (Map keys are unique by
/// construction; this audits the cross-store bookkeeping.)
#[must_use]
pub fn check_serial_uniqueness_invariant(state: &RegistryState) -> bool {
    let (devices, _, ledger) = state.stores();

    let keys_match = devices
        .entries()
        .all(|(key, record)| *key == record.serial_number);
    let every_device_has_history = devices
        .iter()
        .all(|record| ledger.history(record.serial_number.as_str()).is_some());
    let no_orphan_history = ledger.len() == devices.len();

    keys_match && every_device_has_history && no_orphan_history
}

/// INVARIANT-2: Authorized Registration
///
/// A record marked `authentic` must point at a manufacturer the
/// Authorization Registry knows (profiles survive revocation, so this holds
/// even after the registrant loses its authorization). No record may name
/// the zero identity as manufacturer.
#[must_use]
pub fn check_registration_provenance_invariant(state: &RegistryState) -> bool {
    let (devices, manufacturers, _) = state.stores();

    devices.iter().all(|record| {
        !record.manufacturer.is_zero()
            && (!record.authentic || manufacturers.has_profile(record.manufacturer))
    })
}

/// INVARIANT-3 / INVARIANT-4: Owner Derivation & Custody Chain
///
/// `current_owner` equals the manufacturer while the history is empty and
/// the last entry's `to` afterwards. The chain is continuous: the first
/// entry leaves the manufacturer, and each entry leaves whoever the previous
/// one delivered to.
#[must_use]
pub fn check_owner_derivation_invariant(state: &RegistryState) -> bool {
    let (devices, _, ledger) = state.stores();

    devices.iter().all(|record| {
        let Some(history) = ledger.history(record.serial_number.as_str()) else {
            return false;
        };
        let derived = history.last().map_or(record.manufacturer, |entry| entry.to);
        if record.current_owner != derived {
            return false;
        }
        let mut holder = record.manufacturer;
        for entry in history {
            if entry.from != holder {
                return false;
            }
            holder = entry.to;
        }
        true
    })
}

/// Owner index consistency: the `devices_owned_by` index agrees exactly with
/// the records' `current_owner` fields, in both directions.
#[must_use]
pub fn check_owner_index_invariant(state: &RegistryState) -> bool {
    let (devices, _, _) = state.stores();

    let forward = devices.iter().all(|record| {
        devices
            .owner_index()
            .get(&record.current_owner)
            .is_some_and(|held| held.contains(record.serial_number.as_str()))
    });
    let reverse = devices.owner_index().iter().all(|(owner, held)| {
        !held.is_empty()
            && held.iter().all(|serial| {
                devices
                    .get(serial.as_str())
                    .is_some_and(|record| record.current_owner == *owner)
            })
    });

    forward && reverse
}

/// Check all single-state invariants at once.
#[must_use]
pub fn check_all_invariants(state: &RegistryState) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_serial_uniqueness_invariant(state) {
        violations.push(InvariantViolation::StoreBookkeepingBroken);
    }
    if !check_registration_provenance_invariant(state) {
        violations.push(InvariantViolation::UnknownProvenance);
    }
    if !check_owner_derivation_invariant(state) {
        violations.push(InvariantViolation::OwnerDerivationBroken);
    }
    if !check_owner_index_invariant(state) {
        violations.push(InvariantViolation::OwnerIndexInconsistent);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// TRANSITION CHECKS (before/after snapshot pairs)
// =============================================================================

/// INVARIANT-1 (over time): no record ever disappears.
#[must_use]
pub fn check_no_removal_invariant(before: &RegistryState, after: &RegistryState) -> bool {
    let (devices_before, _, _) = before.stores();
    devices_before
        .iter()
        .all(|record| after.serial_exists(record.serial_number.as_str()))
}

/// INVARIANT-5: Append-Only History
///
/// Every history in `before` is a prefix of the same serial's history in
/// `after`: nothing shrank, nothing was reordered or rewritten.
#[must_use]
pub fn check_history_extension_invariant(before: &RegistryState, after: &RegistryState) -> bool {
    let (_, _, ledger_before) = before.stores();
    let (_, _, ledger_after) = after.stores();

    ledger_before.iter().all(|(serial, old_history)| {
        ledger_after
            .history(serial.as_str())
            .is_some_and(|new_history| {
                new_history.len() >= old_history.len()
                    && new_history[..old_history.len()] == *old_history
            })
    })
}

/// INVARIANT-6 (over time): the admin identity never changes.
#[must_use]
pub fn check_admin_stability_invariant(before: &RegistryState, after: &RegistryState) -> bool {
    before.admin() == after.admin()
}

/// Check all transition invariants between two snapshots of one registry.
#[must_use]
pub fn check_transition_invariants(
    before: &RegistryState,
    after: &RegistryState,
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_no_removal_invariant(before, after) {
        violations.push(InvariantViolation::RecordRemoved);
    }
    if !check_history_extension_invariant(before, after) {
        violations.push(InvariantViolation::HistoryNotExtended);
    }
    if !check_admin_stability_invariant(before, after) {
        violations.push(InvariantViolation::AdminChanged);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking a set of invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Record keys, histories, and record counts disagree.
    StoreBookkeepingBroken,
    /// A record claims authenticity from a manufacturer the Authorization
    /// Registry has never seen, or names the zero identity.
    UnknownProvenance,
    /// `current_owner` does not follow from the history, or the custody
    /// chain is discontinuous.
    OwnerDerivationBroken,
    /// The owner index disagrees with the records.
    OwnerIndexInconsistent,
    /// A previously registered record is missing.
    RecordRemoved,
    /// A history shrank or was rewritten.
    HistoryNotExtended,
    /// The admin identity differs between snapshots.
    AdminChanged,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreBookkeepingBroken => {
                write!(f, "record keys, histories, and counts disagree")
            }
            Self::UnknownProvenance => {
                write!(f, "record with unknown or zero manufacturer provenance")
            }
            Self::OwnerDerivationBroken => {
                write!(f, "current owner does not follow from the transfer history")
            }
            Self::OwnerIndexInconsistent => {
                write!(f, "owner index disagrees with device records")
            }
            Self::RecordRemoved => {
                write!(f, "a previously registered record is missing")
            }
            Self::HistoryNotExtended => {
                write!(f, "a transfer history shrank or was rewritten")
            }
            Self::AdminChanged => {
                write!(f, "admin identity changed between snapshots")
            }
        }
    }
}

// =============================================================================
// VALIDATION LIMITS
// =============================================================================

/// Input bounds enforced before any mutation.
pub mod limits {
    /// Maximum serial number length in bytes.
    pub const MAX_SERIAL_LEN: usize = 64;

    /// Maximum length of one descriptive field (brand, model, ...) in bytes.
    pub const MAX_FIELD_LEN: usize = 128;

    /// Maximum transfer reason length in bytes.
    pub const MAX_REASON_LEN: usize = 256;

    /// Maximum identities per authorize/revoke batch.
    pub const MAX_AUTHORIZATION_BATCH: usize = 128;
}

// =============================================================================
// TESTS
// =============================================================================
