//! # Value Objects
//!
//! Immutable domain primitives for the provenance registry.
//! These types represent concepts that are defined by their value, not identity.

use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// Re-export U256 from primitive-types for price arithmetic
pub use primitive_types::U256;

/// Seconds since the UNIX epoch, as reported by a [`TimeSource`].
///
/// [`TimeSource`]: crate::ports::outbound::TimeSource
pub type Timestamp = u64;

// =============================================================================
// IDENTITY (20 bytes)
// =============================================================================

/// A 20-byte principal identity.
///
/// Used both as a caller reference and as a stored value (manufacturer,
/// owner, admin). The registry trusts the hosting environment to have
/// authenticated it; no key material is handled here.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Identity(pub [u8; 20]);

impl Identity {
    /// The zero identity (0x0000...0000). Reserved; never a valid principal.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an identity from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an identity from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 20 {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Parses a hex string, with or without a `0x` prefix.
    /// Returns None unless it decodes to exactly 20 bytes.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(stripped).ok()?;
        Self::from_slice(&decoded)
    }

    /// Returns the full `0x`-prefixed hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Identity {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Identity> for [u8; 20] {
    fn from(id: Identity) -> Self {
        id.0
    }
}

// =============================================================================
// SPEC DIGEST (32 bytes)
// =============================================================================

/// A 32-byte opaque digest (e.g., SHA-256 of a device's spec sheet).
///
/// The registry stores it verbatim; it never recomputes or interprets it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SpecDigest(pub [u8; 32]);

impl SpecDigest {
    /// The zero digest.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a digest from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a digest from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 32 {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true if this is the zero digest.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for SpecDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SpecDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[28..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for SpecDigest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<SpecDigest> for [u8; 32] {
    fn from(digest: SpecDigest) -> Self {
        digest.0
    }
}

// =============================================================================
// SERIAL NUMBER
// =============================================================================

/// A validated serial number: non-empty, at most
/// [`limits::MAX_SERIAL_LEN`](crate::domain::invariants::limits::MAX_SERIAL_LEN)
/// bytes.
///
/// The only way to obtain one is [`SerialNumber::parse`], so every key in the
/// identity store is well formed. Lookups accept plain `&str` through the
/// `Borrow<str>` impl, which keeps queries total: an arbitrary string that
/// cannot parse simply finds no record.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Validates and wraps a serial number.
    ///
    /// # Errors
    /// Returns `EmptySerial` for the empty string and `SerialTooLong` when
    /// the byte length exceeds the limit.
    pub fn parse(value: impl Into<String>) -> Result<Self, RegistryError> {
        let value = value.into();
        if value.is_empty() {
            return Err(RegistryError::EmptySerial);
        }
        let max = crate::domain::invariants::limits::MAX_SERIAL_LEN;
        if value.len() > max {
            return Err(RegistryError::SerialTooLong {
                length: value.len(),
                max,
            });
        }
        Ok(Self(value))
    }

    /// Returns the serial number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SerialNumber {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SerialNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SerialNumber> for String {
    fn from(serial: SerialNumber) -> Self {
        serial.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
