//! # Registry Errors
//!
//! Typed failures for every mutating operation. Mutations are all-or-nothing:
//! whenever one of these is returned, the registry state is exactly as it was
//! before the call and no notification has been emitted.
//!
//! Variants are granular so callers can log precisely; [`RegistryError::kind`]
//! collapses them into the four normative classes hosts branch on.

use crate::domain::value_objects::{Identity, SerialNumber};
use thiserror::Error;

// =============================================================================
// ERROR KIND
// =============================================================================

/// The normative classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks the required role or ownership.
    Unauthorized,
    /// Registration targeted a serial number that already has a record.
    DuplicateSerial,
    /// Operation targeted a serial number with no record.
    NotFound,
    /// Malformed arguments: empty serial, oversized input, zero-identity
    /// target, self-transfer.
    InvalidInput,
}

// =============================================================================
// REGISTRY ERROR
// =============================================================================

/// Errors returned by registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the registry admin (INVARIANT-6).
    #[error("caller {caller} is not the registry admin")]
    NotAdmin {
        /// The rejected caller.
        caller: Identity,
    },

    /// Caller is not an authorized manufacturer (INVARIANT-2).
    #[error("caller {caller} is not an authorized manufacturer")]
    NotAuthorized {
        /// The rejected caller.
        caller: Identity,
    },

    /// Caller does not currently own the device (INVARIANT-4).
    #[error("caller {caller} does not own device {serial}")]
    NotOwner {
        /// The rejected caller.
        caller: Identity,
        /// The device the caller tried to transfer.
        serial: SerialNumber,
    },

    /// A record already exists for the serial number (INVARIANT-1).
    #[error("serial number {serial} is already registered")]
    DuplicateSerial {
        /// The colliding serial number.
        serial: SerialNumber,
    },

    /// No record exists for the serial number.
    #[error("no device is registered under serial number {serial:?}")]
    UnknownSerial {
        /// The raw serial string as the caller supplied it.
        serial: String,
    },

    /// The serial number is the empty string.
    #[error("serial number must not be empty")]
    EmptySerial,

    /// The serial number exceeds the length limit.
    #[error("serial number is {length} bytes, limit is {max}")]
    SerialTooLong {
        /// Supplied length in bytes.
        length: usize,
        /// The enforced limit.
        max: usize,
    },

    /// A descriptive field or transfer reason exceeds its length limit.
    #[error("field `{field}` is {length} bytes, limit is {max}")]
    FieldTooLong {
        /// Which field was rejected.
        field: &'static str,
        /// Supplied length in bytes.
        length: usize,
        /// The enforced limit.
        max: usize,
    },

    /// The zero identity was supplied where a real principal is required.
    #[error("the zero identity cannot be {role}")]
    ZeroIdentity {
        /// What the zero identity was offered as.
        role: &'static str,
    },

    /// Transfer target equals the current owner.
    #[error("device is already owned by {owner}")]
    SelfTransfer {
        /// The current owner (and attempted target).
        owner: Identity,
    },

    /// An authorization batch exceeds the size limit.
    #[error("authorization batch of {size} exceeds limit of {max}")]
    BatchTooLarge {
        /// Supplied batch size.
        size: usize,
        /// The enforced limit.
        max: usize,
    },
}

impl RegistryError {
    /// Classifies this error into its normative kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAdmin { .. } | Self::NotAuthorized { .. } | Self::NotOwner { .. } => {
                ErrorKind::Unauthorized
            }
            Self::DuplicateSerial { .. } => ErrorKind::DuplicateSerial,
            Self::UnknownSerial { .. } => ErrorKind::NotFound,
            Self::EmptySerial
            | Self::SerialTooLong { .. }
            | Self::FieldTooLong { .. }
            | Self::ZeroIdentity { .. }
            | Self::SelfTransfer { .. }
            | Self::BatchTooLarge { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Returns true if the caller simply lacked a role or ownership.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    /// Returns true if the target serial number had no record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns true for malformed-argument rejections.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

// =============================================================================
// SNAPSHOT ERROR
// =============================================================================

/// Failure to encode or decode a registry snapshot.
///
/// Kept separate from [`RegistryError`]: snapshot codec faults are a host
/// persistence concern, never the outcome of a registry operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("snapshot codec failure: {message}")]
pub struct SnapshotError {
    /// Human-readable cause from the underlying codec.
    pub message: String,
}

// =============================================================================
// TESTS
// =============================================================================
