//! # Driven Ports (SPI - Outbound)
//!
//! What the registry needs from its environment: a clock and somewhere to
//! deliver notification records. Concrete implementations live in
//! [`adapters`](crate::adapters); the domain itself never touches either.
//! Time flows in as an argument and events flow out as return values, with
//! the service layer bridging both.

use crate::domain::state::RegistryState;
use crate::domain::value_objects::Timestamp;
use crate::errors::SnapshotError;
use crate::events::RegistryEvent;
use async_trait::async_trait;

// =============================================================================
// TIME SOURCE
// =============================================================================

/// Provides the current time for manufacturing and transfer timestamps.
///
/// Injected so tests and replay tooling can run on a deterministic clock.
pub trait TimeSource: Send + Sync {
    /// Current time in seconds since the UNIX epoch.
    fn now(&self) -> Timestamp;
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Receives the notification record of each successful mutation.
///
/// The service publishes exactly once per successful operation, while still
/// holding the state write lock, so sink delivery order equals mutation
/// serialization order. Failed operations never reach the sink.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the event.
    async fn publish(&self, event: RegistryEvent) -> usize;

    /// Total events delivered to this sink so far.
    fn events_published(&self) -> u64;
}

// =============================================================================
// STATE CODEC
// =============================================================================

/// Turns registry state into durable bytes and back.
///
/// Encoding must be deterministic: two encodes of equal state produce equal
/// bytes, so a digest over the encoding identifies the state.
pub trait StateCodec: Send + Sync {
    /// Serialize the full registry state.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the underlying codec rejects the state.
    fn encode(&self, state: &RegistryState) -> Result<Vec<u8>, SnapshotError>;

    /// Reconstruct registry state from bytes produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on truncated or foreign input.
    fn decode(&self, bytes: &[u8]) -> Result<RegistryState, SnapshotError>;
}
