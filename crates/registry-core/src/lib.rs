//! # Registry Core - Device Provenance Subsystem
//!
//! The authoritative record of device identity, origin, and custody.
//! Manufacturers register devices under unique serial numbers; owners pass
//! custody down an append-only history; anyone verifies a serial number and
//! learns whether the device is genuine and who holds it now.
//!
//! ## Purpose
//!
//! Answers three questions about any serial number, with no trust in the
//! asker required:
//!
//! 1. **Is it real?** A record exists and its registrant was authorized.
//! 2. **Where did it come from?** The registering manufacturer of record.
//! 3. **Who holds it?** The full custody chain from factory to the current
//!    owner.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Serial Uniqueness | `domain/identity_store.rs` - `IdentityStore::insert()` |
//! | INVARIANT-2 | Authorized Registration | `domain/state.rs` - `register_device()` role gate |
//! | INVARIANT-3 | Owner Derivation | `domain/state.rs` - `transfer_ownership()` reassigns from history |
//! | INVARIANT-4 | Owner-Only Transfer | `domain/state.rs` - `transfer_ownership()` custody gate |
//! | INVARIANT-5 | Append-Only History | `domain/ledger.rs` - `OwnershipLedger::append()` |
//! | INVARIANT-6 | Admin-Only Authorization | `domain/state.rs` - `ensure_admin()` |
//!
//! Checkers for the whole suite live in `domain/invariants.rs`; the service
//! can re-run them after every write (`verify_invariants_after_write`).
//!
//! ## Trust Boundary
//!
//! The registry holds **no keys and verifies no signatures**. Every `caller`
//! argument is an identity the host has already authenticated; this crate
//! decides only what that identity may do. Anything emitted to the event
//! sink describes a mutation that has already been applied.
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Identity Store | `domain/identity_store.rs` | Serial number -> record, owner index |
//! | Authorization Registry | `domain/authorization.rs` | Who may register, admin policy |
//! | Ownership Ledger | `domain/ledger.rs` | Append-only custody histories |
//! | Registry State | `domain/state.rs` | Atomic operations over all three stores |
//! | Service | `service.rs` | Locking, clock, events, statistics |
//! | Event Bus | `adapters/bus.rs` | Broadcast fan-out with filtering |
//! | Snapshot Codec | `adapters/snapshot.rs` | Durable state bytes + SHA-256 digest |
//!
//! ## Usage Example
//!
//! ```ignore
//! use registry_core::prelude::*;
//!
//! let config = ServiceConfig::new(RegistryConfig::new(admin));
//! let service = RegistryService::new(config, InMemoryEventBus::new(), SystemClock);
//!
//! service.authorize_manufacturers(admin, vec![apple]).await?;
//! service.register_device(apple, submission).await?;
//!
//! let report = service.verify_device("SN-APL-001").await;
//! assert!(report.authentic);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        CustodyState, DeviceRecord, DeviceSubmission, ManufacturerProfile, RegistryConfig,
        SeedManufacturer, TransferRecord, VerificationReport,
    };

    // Value objects
    pub use crate::domain::value_objects::{Identity, SerialNumber, SpecDigest, Timestamp, U256};

    // State and stores
    pub use crate::domain::authorization::AuthorizationRegistry;
    pub use crate::domain::identity_store::IdentityStore;
    pub use crate::domain::ledger::OwnershipLedger;
    pub use crate::domain::state::RegistryState;

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, check_transition_invariants, limits, InvariantCheckResult,
        InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{DeviceRegistryApi, RegistryAdminApi};
    pub use crate::ports::outbound::{EventSink, StateCodec, TimeSource};

    // Events
    pub use crate::events::{EventFilter, EventTopic, RegistryEvent};

    // Errors
    pub use crate::errors::{ErrorKind, RegistryError, SnapshotError};

    // Adapters
    pub use crate::adapters::bus::{InMemoryEventBus, RecordingEventSink, Subscription};
    pub use crate::adapters::clock::{ManualClock, SystemClock};
    pub use crate::adapters::snapshot::{BincodeSnapshotCodec, Snapshot};

    // Service
    pub use crate::service::{
        create_test_service, RegistryService, ServiceConfig, ServiceStats,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
