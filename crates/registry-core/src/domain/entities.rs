//! # Domain Entities
//!
//! Core registry records: devices, transfers, manufacturer profiles, and the
//! configuration a host supplies at construction.
//!
//! A [`DeviceRecord`] is immutable after creation except for `current_owner`,
//! which only [`RegistryState::transfer_ownership`] may move. Ownership
//! history lives in the [`OwnershipLedger`], one append-only sequence per
//! serial number.
//!
//! [`RegistryState::transfer_ownership`]: crate::domain::state::RegistryState::transfer_ownership
//! [`OwnershipLedger`]: crate::domain::ledger::OwnershipLedger

use crate::domain::value_objects::{Identity, SerialNumber, SpecDigest, Timestamp, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// DEVICE SUBMISSION
// =============================================================================

/// The payload a manufacturer supplies to register one device.
///
/// The serial number is carried as a raw string; the state machine validates
/// it (and every descriptive field) before any record is created.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSubmission {
    /// Proposed unique serial number.
    pub serial_number: String,
    /// Brand name, e.g. "Apple".
    pub brand: String,
    /// Model name, e.g. "iPhone 15 Pro".
    pub model: String,
    /// Device category, e.g. "Smartphone".
    pub device_type: String,
    /// Storage variant, e.g. "256GB".
    pub storage_variant: String,
    /// Color finish.
    pub color: String,
    /// Production batch number.
    pub batch_number: String,
    /// Opaque digest of the full spec sheet, supplied by the manufacturer.
    pub spec_digest: SpecDigest,
}

impl DeviceSubmission {
    /// Creates a submission with the given serial number and empty
    /// descriptive fields. Intended for struct-update syntax:
    ///
    /// ```
    /// use registry_core::domain::entities::DeviceSubmission;
    ///
    /// let sub = DeviceSubmission {
    ///     brand: "Apple".into(),
    ///     model: "iPhone 15 Pro".into(),
    ///     ..DeviceSubmission::new("SN-APL-001")
    /// };
    /// assert_eq!(sub.serial_number, "SN-APL-001");
    /// ```
    #[must_use]
    pub fn new(serial_number: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            ..Self::default()
        }
    }
}

// =============================================================================
// DEVICE RECORD
// =============================================================================

/// One registered device. Created exactly once per serial number.
///
/// Every field except `current_owner` is frozen at registration time.
/// `authentic` and `manufacturer_name` capture the Authorization Registry's
/// view of the registrant AT THAT MOMENT; later revocation or renaming never
/// rewrites them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Unique serial number (the identity store key).
    pub serial_number: SerialNumber,
    /// Brand name.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Device category.
    pub device_type: String,
    /// Storage variant.
    pub storage_variant: String,
    /// Color finish.
    pub color: String,
    /// Production batch number.
    pub batch_number: String,
    /// Opaque spec-sheet digest as submitted.
    pub spec_digest: SpecDigest,
    /// Identity that registered the device.
    pub manufacturer: Identity,
    /// Display name the Authorization Registry held for the manufacturer at
    /// registration; empty if it had none.
    pub manufacturer_name: String,
    /// Whether the registrant was an authorized manufacturer at registration.
    pub authentic: bool,
    /// Registration time, seconds since the UNIX epoch.
    pub manufacturing_timestamp: Timestamp,
    /// Current custodian. Starts as `manufacturer`, moved by transfers.
    pub current_owner: Identity,
}

// =============================================================================
// TRANSFER RECORD
// =============================================================================

/// One immutable custody change. Appended, never edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Owner relinquishing custody.
    pub from: Identity,
    /// Owner receiving custody.
    pub to: Identity,
    /// Transfer time, seconds since the UNIX epoch.
    pub timestamp: Timestamp,
    /// Free-text reason, e.g. "Sale".
    pub reason: String,
    /// Monetary amount in the ledger's native unit; zero is valid.
    pub price: U256,
}

// =============================================================================
// MANUFACTURER PROFILE
// =============================================================================

/// Authorization Registry entry for one manufacturer identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerProfile {
    /// Display name; empty when the identity was batch-authorized without one.
    pub name: String,
    /// Whether the identity may currently register devices.
    pub authorized: bool,
    /// Monotone counter value assigned when (most recently) authorized.
    /// Orders `list_authorized`; re-authorization assigns a fresh value.
    pub sequence: u64,
}

// =============================================================================
// VERIFICATION REPORT
// =============================================================================

/// Snapshot answer to "is this serial number genuine, and who holds it?".
///
/// Verification is total: unknown serial numbers yield the
/// [`not_found`](VerificationReport::not_found) report instead of an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True iff a record exists for the serial number.
    pub exists: bool,
    /// True iff the record exists and its registrant was authorized at
    /// registration time. Revocation after the fact does not clear this.
    pub authentic: bool,
    /// Brand name; empty when unknown.
    pub brand: String,
    /// Model name; empty when unknown.
    pub model: String,
    /// Device category; empty when unknown.
    pub device_type: String,
    /// Manufacturer display name at registration; empty when unknown.
    pub manufacturer_name: String,
    /// Current custodian; [`Identity::ZERO`] when unknown.
    pub current_owner: Identity,
}

impl VerificationReport {
    /// The all-false/empty report for an unregistered serial number.
    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Builds the report for a registered device.
    #[must_use]
    pub fn for_record(record: &DeviceRecord) -> Self {
        Self {
            exists: true,
            authentic: record.authentic,
            brand: record.brand.clone(),
            model: record.model.clone(),
            device_type: record.device_type.clone(),
            manufacturer_name: record.manufacturer_name.clone(),
            current_owner: record.current_owner,
        }
    }
}

// =============================================================================
// CUSTODY STATE
// =============================================================================

/// Per-serial custody progression.
///
/// ```text
/// Unregistered ──register──> WithManufacturer ──transfer──> Transferred{1}
///                                                               │ transfer
///                                                               ▼
///                                                          Transferred{2} ...
/// ```
///
/// `Unregistered → WithManufacturer` is one-way and one-time; there is no
/// terminal state (transfers may continue indefinitely).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustodyState {
    /// No record exists for the serial number.
    Unregistered,
    /// Registered and never transferred; the manufacturer holds custody.
    WithManufacturer,
    /// Transferred at least once.
    Transferred {
        /// Number of completed transfers.
        transfers: usize,
    },
}

// =============================================================================
// REGISTRY CONFIG
// =============================================================================

/// A manufacturer pre-authorized at construction time.
///
/// Seeding is silent: no notification is emitted, since no observer can be
/// attached before construction returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedManufacturer {
    /// The identity to authorize.
    pub identity: Identity,
    /// Display name recorded for it, e.g. "Apple Inc.".
    pub name: String,
}

/// Host-supplied configuration for one registry instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The single identity permitted to manage the Authorization Registry.
    /// Must not be [`Identity::ZERO`].
    pub admin: Identity,
    /// Whether the admin may register devices without being separately
    /// authorized. When false, the admin is subject to the same
    /// authorization check as everyone else.
    pub admin_may_register: bool,
    /// Manufacturers authorized (with display names) at construction.
    pub seed_manufacturers: Vec<SeedManufacturer>,
}

impl RegistryConfig {
    /// Creates a config with the default policy: the admin may register
    /// devices directly, and no manufacturer is pre-authorized.
    #[must_use]
    pub fn new(admin: Identity) -> Self {
        Self {
            admin,
            admin_may_register: true,
            seed_manufacturers: Vec::new(),
        }
    }

    /// Pre-authorizes a named manufacturer. Chainable.
    #[must_use]
    pub fn with_manufacturer(mut self, identity: Identity, name: impl Into<String>) -> Self {
        self.seed_manufacturers.push(SeedManufacturer {
            identity,
            name: name.into(),
        });
        self
    }

    /// Disables direct admin registration (the strict policy).
    #[must_use]
    pub fn without_admin_registration(mut self) -> Self {
        self.admin_may_register = false;
        self
    }

    /// Config for tests: fixed admin identity `0xadad...adad`.
    #[must_use]
    pub fn for_testing() -> Self {
        Self::new(Identity::new([0xAD; 20]))
    }
}

// =============================================================================
// TESTS
// =============================================================================
