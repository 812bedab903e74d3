//! # Driving Ports (API - Inbound)
//!
//! The operation surface hosts call into. A real deployment exposes these
//! entry points over whatever transport it provides; the registry trusts the
//! host to have authenticated every `caller` identity before it gets here.
//!
//! Two traits, split by role:
//! - [`RegistryAdminApi`] - the admin-only authorization controls
//! - [`DeviceRegistryApi`] - registration, transfer, and all public queries

use crate::domain::entities::{
    CustodyState, DeviceRecord, DeviceSubmission, TransferRecord, VerificationReport,
};
use crate::domain::value_objects::{Identity, SerialNumber, U256};
use crate::errors::RegistryError;
use async_trait::async_trait;

// =============================================================================
// ADMIN API (Authorization Registry controls)
// =============================================================================

/// Admin-only mutations of the Authorization Registry.
///
/// Every call is checked against the single admin identity; there is no
/// other role that may change who can register devices.
#[async_trait]
pub trait RegistryAdminApi: Send + Sync {
    /// Authorize a batch of manufacturer identities. Idempotent per
    /// identity: already-authorized entries are silent no-ops, and one
    /// `ManufacturerAuthorized` notification is emitted per NEWLY authorized
    /// identity.
    ///
    /// # Errors
    ///
    /// * `NotAdmin` - the caller is not the admin
    /// * `BatchTooLarge` / `ZeroIdentity` - malformed batch (nothing applied)
    async fn authorize_manufacturers(
        &self,
        caller: Identity,
        manufacturers: Vec<Identity>,
    ) -> Result<(), RegistryError>;

    /// Revoke a batch of manufacturer identities. Idempotent per identity;
    /// one `ManufacturerRevoked` notification per newly revoked identity.
    /// Devices registered while authorized keep their `authentic` flag.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`authorize_manufacturers`](Self::authorize_manufacturers).
    async fn revoke_manufacturers(
        &self,
        caller: Identity,
        manufacturers: Vec<Identity>,
    ) -> Result<(), RegistryError>;
}

// =============================================================================
// DEVICE REGISTRY API (Primary Driving Port)
// =============================================================================

/// The public registry surface: registration, custody transfer, and the
/// read-only verification queries.
#[async_trait]
pub trait DeviceRegistryApi: Send + Sync {
    /// Register one device under the caller's identity.
    ///
    /// On success a `DeviceRegistered` notification is emitted and the
    /// caller becomes the device's manufacturer and initial owner.
    ///
    /// # Errors
    ///
    /// * `NotAuthorized` - caller may not register (not authorized, and the
    ///   admin policy does not apply)
    /// * `DuplicateSerial` - the serial number is already taken
    /// * `EmptySerial` / `SerialTooLong` / `FieldTooLong` - malformed input
    async fn register_device(
        &self,
        caller: Identity,
        submission: DeviceSubmission,
    ) -> Result<(), RegistryError>;

    /// Transfer custody of a device to another identity.
    ///
    /// On success one history entry is appended and `OwnershipTransferred`
    /// is emitted.
    ///
    /// # Errors
    ///
    /// * `UnknownSerial` - no record for the serial number
    /// * `NotOwner` - the caller does not hold custody
    /// * `ZeroIdentity` / `SelfTransfer` / `FieldTooLong` - malformed input
    async fn transfer_ownership(
        &self,
        caller: Identity,
        serial: &str,
        to: Identity,
        reason: &str,
        price: U256,
    ) -> Result<(), RegistryError>;

    /// True iff the identity is currently an authorized manufacturer.
    async fn is_authorized(&self, identity: Identity) -> bool;

    /// All currently authorized identities, in authorization order.
    async fn list_authorized(&self) -> Vec<Identity>;

    /// Verify one serial number. Total: never fails, unknown serial numbers
    /// yield the all-false/empty report.
    async fn verify_device(&self, serial: &str) -> VerificationReport;

    /// Verify a batch of serial numbers. One report per query, in query
    /// order; unknown serial numbers never short-circuit the rest.
    async fn verify_devices(&self, serials: &[String]) -> Vec<VerificationReport>;

    /// The full record for a registered device.
    ///
    /// # Errors
    ///
    /// * `UnknownSerial` - no record for the serial number
    async fn device_details(&self, serial: &str) -> Result<DeviceRecord, RegistryError>;

    /// The transfer history for a registered device, oldest first. Empty for
    /// a device that has never been transferred.
    ///
    /// # Errors
    ///
    /// * `UnknownSerial` - the serial number was never registered
    async fn ownership_history(&self, serial: &str)
        -> Result<Vec<TransferRecord>, RegistryError>;

    /// Serial numbers currently held by the identity.
    async fn owner_devices(&self, owner: Identity) -> Vec<SerialNumber>;

    /// True iff a record exists for the serial number.
    async fn serial_exists(&self, serial: &str) -> bool;

    /// Where the serial number sits in the custody progression.
    async fn custody_state(&self, serial: &str) -> CustodyState;

    /// The admin identity.
    async fn admin(&self) -> Identity;
}
