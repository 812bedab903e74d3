//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the outbound ports, plus the subscription
//! handle hosts use to consume events.
//!
//! | Adapter | Implements | Use |
//! |---------|-----------|-----|
//! | [`SystemClock`] | [`TimeSource`](crate::ports::outbound::TimeSource) | Production wall clock |
//! | [`ManualClock`] | [`TimeSource`](crate::ports::outbound::TimeSource) | Deterministic tests and replay |
//! | [`InMemoryEventBus`] | [`EventSink`](crate::ports::outbound::EventSink) | Broadcast fan-out to subscribers |
//! | [`RecordingEventSink`] | [`EventSink`](crate::ports::outbound::EventSink) | Audit log, test assertions |
//! | [`BincodeSnapshotCodec`] | [`StateCodec`](crate::ports::outbound::StateCodec) | Durable state encoding |

pub mod bus;
pub mod clock;
pub mod snapshot;

pub use bus::*;
pub use clock::*;
pub use snapshot::*;
