//! # Provenance-Ledger Test Suite
//!
//! Unified test crate for flows that cross the service surface.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/          # End-to-end registry flows
//!     ├── lifecycle.rs      # Register -> transfer -> verify chains
//!     ├── authorization.rs  # Admin controls and registration policy
//!     └── verification.rs   # Query totality, events, snapshots
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p registry-tests
//!
//! # By category
//! cargo test -p registry-tests integration::lifecycle
//!
//! # Benchmarks
//! cargo bench -p registry-tests
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;

/// Route registry tracing output through the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// Filter with e.g. `RUST_LOG=registry_core=debug cargo test -p registry-tests`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
