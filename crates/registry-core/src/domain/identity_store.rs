//! # Identity Store
//!
//! One [`DeviceRecord`] per serial number, plus a current-owner index kept in
//! lockstep with the records. Uniqueness (INVARIANT-1) is enforced here:
//! [`IdentityStore::insert`] is the only way in, and it rejects any serial
//! number that already has a record. Records are never removed.

use crate::domain::entities::DeviceRecord;
use crate::domain::value_objects::{Identity, SerialNumber};
use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// All registered devices, keyed by serial number.
///
/// `BTreeMap` keeps iteration (and therefore snapshots and owner listings)
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityStore {
    /// The records themselves.
    records: BTreeMap<SerialNumber, DeviceRecord>,
    /// Current owner -> serial numbers held. Maintained by `insert` and
    /// `reassign_owner`; never read for correctness, only for owner queries.
    by_owner: BTreeMap<Identity, BTreeSet<SerialNumber>>,
}

impl IdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True iff no device has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True iff a record exists for the serial number. Total: any string is
    /// a valid question.
    #[must_use]
    pub fn contains(&self, serial: &str) -> bool {
        self.records.contains_key(serial)
    }

    /// Looks up a record. Total over all strings.
    #[must_use]
    pub fn get(&self, serial: &str) -> Option<&DeviceRecord> {
        self.records.get(serial)
    }

    /// Inserts a new record.
    ///
    /// # Errors
    /// Returns `DuplicateSerial` if the serial number already has a record;
    /// the store is unchanged in that case.
    pub fn insert(&mut self, record: DeviceRecord) -> Result<(), RegistryError> {
        if self.records.contains_key(&record.serial_number) {
            return Err(RegistryError::DuplicateSerial {
                serial: record.serial_number,
            });
        }
        self.by_owner
            .entry(record.current_owner)
            .or_default()
            .insert(record.serial_number.clone());
        self.records.insert(record.serial_number.clone(), record);
        Ok(())
    }

    /// Moves a record to a new owner, updating the owner index.
    /// Returns the previous owner, or None if the serial number is unknown.
    pub fn reassign_owner(
        &mut self,
        serial: &SerialNumber,
        new_owner: Identity,
    ) -> Option<Identity> {
        let record = self.records.get_mut(serial.as_str())?;
        let previous = record.current_owner;
        record.current_owner = new_owner;

        if let Some(held) = self.by_owner.get_mut(&previous) {
            held.remove(serial.as_str());
            if held.is_empty() {
                self.by_owner.remove(&previous);
            }
        }
        self.by_owner
            .entry(new_owner)
            .or_default()
            .insert(serial.clone());
        Some(previous)
    }

    /// Serial numbers currently held by the identity, in lexicographic
    /// order. Stable across repeated calls absent mutation.
    #[must_use]
    pub fn owned_by(&self, owner: Identity) -> Vec<SerialNumber> {
        self.by_owner
            .get(&owner)
            .map(|held| held.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Iterates all records in serial-number order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.records.values()
    }

    /// Iterates (key, record) pairs, for consistency checking.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&SerialNumber, &DeviceRecord)> {
        self.records.iter()
    }

    /// The owner index, for consistency checking.
    #[must_use]
    pub(crate) fn owner_index(&self) -> &BTreeMap<Identity, BTreeSet<SerialNumber>> {
        &self.by_owner
    }
}

// =============================================================================
// TESTS
// =============================================================================
