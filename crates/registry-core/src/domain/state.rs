//! # Registry State
//!
//! The single-writer state machine composing the three stores:
//!
//! ```text
//!                      ┌──────────────────────┐
//!   authorize/revoke ──▶                      │
//!   register ─────────▶│    RegistryState     │──▶ RegistryEvent(s)
//!   transfer ─────────▶│                      │
//!                      │  ┌────────────────┐  │
//!    verify/queries ◀──┤  │ IdentityStore  │  │
//!                      │  ├────────────────┤  │
//!                      │  │ Authorization  │  │
//!                      │  ├────────────────┤  │
//!                      │  │ OwnershipLedger│  │
//!                      │  └────────────────┘  │
//!                      └──────────────────────┘
//! ```
//!
//! Every mutation validates COMPLETELY before touching any store, so a typed
//! failure always leaves the state byte-for-byte as it was: no partial
//! history entries, no partial owner updates, no events. Successful
//! mutations return the notification records for the service layer to
//! publish; the state machine itself performs no I/O.

use crate::domain::authorization::AuthorizationRegistry;
use crate::domain::entities::{
    CustodyState, DeviceRecord, DeviceSubmission, RegistryConfig, TransferRecord,
    VerificationReport,
};
use crate::domain::identity_store::IdentityStore;
use crate::domain::invariants::limits;
use crate::domain::ledger::OwnershipLedger;
use crate::domain::value_objects::{Identity, SerialNumber, Timestamp, U256};
use crate::errors::RegistryError;
use crate::events::RegistryEvent;
use serde::{Deserialize, Serialize};

/// The registry's entire logical state. Serializable, so a host can snapshot
/// and reconstruct behavior exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    devices: IdentityStore,
    manufacturers: AuthorizationRegistry,
    ledger: OwnershipLedger,
}

impl RegistryState {
    /// Builds a fresh registry from host configuration. Seeded manufacturers
    /// are authorized silently (no events; nothing can observe construction).
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let mut manufacturers =
            AuthorizationRegistry::new(config.admin, config.admin_may_register);
        for seed in &config.seed_manufacturers {
            manufacturers.authorize_named(seed.identity, &seed.name);
        }
        Self {
            devices: IdentityStore::new(),
            manufacturers,
            ledger: OwnershipLedger::new(),
        }
    }

    // =========================================================================
    // AUTHORIZATION
    // =========================================================================

    /// The admin identity.
    #[must_use]
    pub fn admin(&self) -> Identity {
        self.manufacturers.admin()
    }

    /// True iff the identity is currently an authorized manufacturer.
    #[must_use]
    pub fn is_authorized(&self, identity: Identity) -> bool {
        self.manufacturers.is_authorized(identity)
    }

    /// Currently authorized identities, in authorization order.
    #[must_use]
    pub fn list_authorized(&self) -> Vec<Identity> {
        self.manufacturers.list_authorized()
    }

    /// Number of currently authorized manufacturers.
    #[must_use]
    pub fn authorized_count(&self) -> usize {
        self.manufacturers.authorized_count()
    }

    /// Authorizes a batch of manufacturer identities (INVARIANT-6: admin
    /// only). Idempotent per identity; one `ManufacturerAuthorized` event per
    /// NEWLY authorized identity, in batch order.
    ///
    /// # Errors
    /// `NotAdmin` when the caller is not the admin; `BatchTooLarge` /
    /// `ZeroIdentity` for malformed batches. Nothing is authorized unless the
    /// whole batch is acceptable.
    pub fn authorize_manufacturers(
        &mut self,
        caller: Identity,
        targets: &[Identity],
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        self.ensure_admin(caller)?;
        Self::check_batch(targets)?;

        let mut events = Vec::new();
        for &target in targets {
            if self.manufacturers.authorize(target) {
                events.push(RegistryEvent::ManufacturerAuthorized {
                    manufacturer: target,
                });
            }
        }
        Ok(events)
    }

    /// Revokes a batch of manufacturer identities (admin only). Idempotent
    /// per identity; one `ManufacturerRevoked` event per newly revoked
    /// identity. Devices registered while authorized keep `authentic = true`.
    ///
    /// # Errors
    /// Same batch rules as [`authorize_manufacturers`](Self::authorize_manufacturers).
    pub fn revoke_manufacturers(
        &mut self,
        caller: Identity,
        targets: &[Identity],
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        self.ensure_admin(caller)?;
        Self::check_batch(targets)?;

        let mut events = Vec::new();
        for &target in targets {
            if self.manufacturers.revoke(target) {
                events.push(RegistryEvent::ManufacturerRevoked {
                    manufacturer: target,
                });
            }
        }
        Ok(events)
    }

    fn ensure_admin(&self, caller: Identity) -> Result<(), RegistryError> {
        if caller == self.manufacturers.admin() {
            Ok(())
        } else {
            Err(RegistryError::NotAdmin { caller })
        }
    }

    fn check_batch(targets: &[Identity]) -> Result<(), RegistryError> {
        if targets.len() > limits::MAX_AUTHORIZATION_BATCH {
            return Err(RegistryError::BatchTooLarge {
                size: targets.len(),
                max: limits::MAX_AUTHORIZATION_BATCH,
            });
        }
        if targets.iter().any(Identity::is_zero) {
            return Err(RegistryError::ZeroIdentity {
                role: "an authorized manufacturer",
            });
        }
        Ok(())
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Registers one device (INVARIANT-1, INVARIANT-2).
    ///
    /// Validation order: serial number shape, descriptive field bounds,
    /// caller role, uniqueness. On success the record is created with the
    /// caller as manufacturer and initial owner, its (empty) history is
    /// opened, and `DeviceRegistered` is returned.
    ///
    /// # Errors
    /// `EmptySerial` / `SerialTooLong` / `FieldTooLong` for malformed input,
    /// `NotAuthorized` when the caller may not register, `DuplicateSerial`
    /// when the serial number is taken.
    pub fn register_device(
        &mut self,
        caller: Identity,
        submission: DeviceSubmission,
        now: Timestamp,
    ) -> Result<RegistryEvent, RegistryError> {
        let serial = SerialNumber::parse(submission.serial_number.as_str())?;
        Self::check_field("brand", &submission.brand)?;
        Self::check_field("model", &submission.model)?;
        Self::check_field("device_type", &submission.device_type)?;
        Self::check_field("storage_variant", &submission.storage_variant)?;
        Self::check_field("color", &submission.color)?;
        Self::check_field("batch_number", &submission.batch_number)?;

        if !self.manufacturers.may_register(caller) {
            return Err(RegistryError::NotAuthorized { caller });
        }

        let record = DeviceRecord {
            serial_number: serial.clone(),
            brand: submission.brand,
            model: submission.model,
            device_type: submission.device_type,
            storage_variant: submission.storage_variant,
            color: submission.color,
            batch_number: submission.batch_number,
            spec_digest: submission.spec_digest,
            manufacturer: caller,
            manufacturer_name: self.manufacturers.display_name(caller).to_string(),
            authentic: self.manufacturers.is_authorized(caller),
            manufacturing_timestamp: now,
            current_owner: caller,
        };
        self.devices.insert(record)?;
        self.ledger.open(&serial);

        Ok(RegistryEvent::DeviceRegistered {
            serial_number: serial,
            manufacturer: caller,
        })
    }

    fn check_field(field: &'static str, value: &str) -> Result<(), RegistryError> {
        if value.len() > limits::MAX_FIELD_LEN {
            return Err(RegistryError::FieldTooLong {
                field,
                length: value.len(),
                max: limits::MAX_FIELD_LEN,
            });
        }
        Ok(())
    }

    // =========================================================================
    // TRANSFER
    // =========================================================================

    /// Moves custody of a device (INVARIANT-3, INVARIANT-4, INVARIANT-5).
    ///
    /// Validation order: existence, caller ownership, target validity,
    /// reason bound. On success one entry is appended to the history, the
    /// record's owner is updated, and `OwnershipTransferred` is returned.
    ///
    /// # Errors
    /// `UnknownSerial` for unregistered serial numbers, `NotOwner` when the
    /// caller does not hold custody, `ZeroIdentity` / `SelfTransfer` /
    /// `FieldTooLong` for malformed arguments.
    pub fn transfer_ownership(
        &mut self,
        caller: Identity,
        serial: &str,
        to: Identity,
        reason: &str,
        price: U256,
        now: Timestamp,
    ) -> Result<RegistryEvent, RegistryError> {
        let record = self
            .devices
            .get(serial)
            .ok_or_else(|| RegistryError::UnknownSerial {
                serial: serial.to_string(),
            })?;
        let serial_key = record.serial_number.clone();

        if record.current_owner != caller {
            return Err(RegistryError::NotOwner {
                caller,
                serial: serial_key,
            });
        }
        if to.is_zero() {
            return Err(RegistryError::ZeroIdentity {
                role: "a transfer target",
            });
        }
        if to == caller {
            return Err(RegistryError::SelfTransfer { owner: caller });
        }
        if reason.len() > limits::MAX_REASON_LEN {
            return Err(RegistryError::FieldTooLong {
                field: "reason",
                length: reason.len(),
                max: limits::MAX_REASON_LEN,
            });
        }

        self.ledger.append(
            &serial_key,
            TransferRecord {
                from: caller,
                to,
                timestamp: now,
                reason: reason.to_string(),
                price,
            },
        );
        self.devices.reassign_owner(&serial_key, to);

        Ok(RegistryEvent::OwnershipTransferred {
            serial_number: serial_key,
            from: caller,
            to,
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// True iff a record exists for the serial number. Total.
    #[must_use]
    pub fn serial_exists(&self, serial: &str) -> bool {
        self.devices.contains(serial)
    }

    /// The full device record.
    ///
    /// # Errors
    /// `UnknownSerial` when no record exists.
    pub fn device_details(&self, serial: &str) -> Result<&DeviceRecord, RegistryError> {
        self.devices
            .get(serial)
            .ok_or_else(|| RegistryError::UnknownSerial {
                serial: serial.to_string(),
            })
    }

    /// Serial numbers currently held by the identity, lexicographic order.
    #[must_use]
    pub fn devices_owned_by(&self, owner: Identity) -> Vec<SerialNumber> {
        self.devices.owned_by(owner)
    }

    /// The transfer history for a registered serial number, oldest first.
    /// Empty slice for a device that has never been transferred.
    ///
    /// # Errors
    /// `UnknownSerial` when the serial number was never registered.
    pub fn ownership_history(&self, serial: &str) -> Result<&[TransferRecord], RegistryError> {
        self.ledger
            .history(serial)
            .ok_or_else(|| RegistryError::UnknownSerial {
                serial: serial.to_string(),
            })
    }

    /// Verifies one serial number. Total over all strings: unknown serial
    /// numbers yield [`VerificationReport::not_found`], never an error.
    #[must_use]
    pub fn verify_device(&self, serial: &str) -> VerificationReport {
        self.devices
            .get(serial)
            .map_or_else(VerificationReport::not_found, VerificationReport::for_record)
    }

    /// Verifies a batch. One report per query, in query order; unknown
    /// serial numbers never short-circuit the rest.
    #[must_use]
    pub fn verify_devices<S: AsRef<str>>(&self, serials: &[S]) -> Vec<VerificationReport> {
        serials
            .iter()
            .map(|s| self.verify_device(s.as_ref()))
            .collect()
    }

    /// Where a serial number sits in the custody progression. Total.
    #[must_use]
    pub fn custody_state(&self, serial: &str) -> CustodyState {
        if !self.devices.contains(serial) {
            return CustodyState::Unregistered;
        }
        match self.ledger.transfer_count(serial) {
            None | Some(0) => CustodyState::WithManufacturer,
            Some(transfers) => CustodyState::Transferred { transfers },
        }
    }

    /// Number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Total transfers recorded across all devices.
    #[must_use]
    pub fn total_transfers(&self) -> usize {
        self.ledger.total_transfers()
    }

    /// The underlying stores, for invariant checking.
    #[must_use]
    pub(crate) fn stores(&self) -> (&IdentityStore, &AuthorizationRegistry, &OwnershipLedger) {
        (&self.devices, &self.manufacturers, &self.ledger)
    }
}

// =============================================================================
// TESTS
// =============================================================================
