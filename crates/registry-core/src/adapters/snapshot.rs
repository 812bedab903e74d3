//! # Snapshot Codec
//!
//! Durable encoding of [`RegistryState`] for host persistence. The format is
//! bincode over the state's ordered maps, which makes the encoding
//! deterministic: equal state always produces equal bytes, so the SHA-256
//! digest of a snapshot identifies the registry contents it was taken from.
//!
//! Hosts store the bytes wherever they like (file, object store, database
//! blob) and keep the digest alongside to detect corruption on the way back.

use crate::domain::state::RegistryState;
use crate::errors::SnapshotError;
use crate::ports::outbound::StateCodec;
use sha2::{Digest, Sha256};

// =============================================================================
// BINCODE CODEC
// =============================================================================

/// Default state codec using bincode.
#[derive(Default)]
pub struct BincodeSnapshotCodec;

impl StateCodec for BincodeSnapshotCodec {
    fn encode(&self, state: &RegistryState) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(state).map_err(|e| SnapshotError {
            message: e.to_string(),
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<RegistryState, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError {
            message: e.to_string(),
        })
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// An encoded registry state together with its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    bytes: Vec<u8>,
    digest: [u8; 32],
}

impl Snapshot {
    /// Encode the given state and fingerprint it.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when encoding fails.
    pub fn capture(state: &RegistryState) -> Result<Self, SnapshotError> {
        let bytes = BincodeSnapshotCodec.encode(state)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Wrap bytes read back from storage, recomputing the digest.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let digest = Sha256::digest(&bytes).into();
        Self { bytes, digest }
    }

    /// Reconstruct the registry state this snapshot encodes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on truncated or foreign bytes.
    pub fn restore(&self) -> Result<RegistryState, SnapshotError> {
        BincodeSnapshotCodec.decode(&self.bytes)
    }

    /// The encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the snapshot, yielding the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// SHA-256 digest of the encoded bytes.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        self.digest
    }

    /// Digest as lowercase hex, for logs and sidecar files.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// True iff the stored digest matches `expected`.
    #[must_use]
    pub fn verify_digest(&self, expected: &[u8; 32]) -> bool {
        &self.digest == expected
    }

    /// Encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True iff the snapshot holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
