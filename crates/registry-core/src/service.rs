//! # Registry Service
//!
//! The application layer that hosts embed. It wraps [`RegistryState`] behind
//! a single writer lock, stamps mutations with the injected clock, publishes
//! one notification per successful mutation, and keeps operation statistics.
//!
//! ## Serialization contract
//!
//! - All mutations go through one `tokio::sync::RwLock` writer, so
//!   concurrent callers observe some total order of operations.
//! - Events are published while the write guard is still held, so sink
//!   delivery order equals mutation order.
//! - Failed operations change nothing and publish nothing.
//!
//! ## Identity trust
//!
//! The service never authenticates anyone. Every `caller` argument is
//! assumed to be a verified identity; binding transport credentials to
//! identities is the host's problem.

use crate::adapters::bus::RecordingEventSink;
use crate::adapters::clock::ManualClock;
use crate::adapters::snapshot::Snapshot;
use crate::domain::entities::{
    CustodyState, DeviceRecord, DeviceSubmission, RegistryConfig, TransferRecord,
    VerificationReport,
};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::state::RegistryState;
use crate::domain::value_objects::{Identity, SerialNumber, U256};
use crate::errors::{RegistryError, SnapshotError};
use crate::ports::inbound::{DeviceRegistryApi, RegistryAdminApi};
use crate::ports::outbound::{EventSink, TimeSource};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// SERVICE CONFIG
// =============================================================================

/// Registry service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Domain configuration: admin identity, registration policy, and seeds.
    pub registry: RegistryConfig,
    /// Re-check the structural invariants after every successful mutation.
    /// Costs a full state walk per write; intended for tests and for hosts
    /// that prefer loud corruption over fast writes.
    pub verify_invariants_after_write: bool,
    /// Count read-path queries in the service statistics.
    pub track_query_stats: bool,
}

impl ServiceConfig {
    /// Production defaults around the given domain config.
    #[must_use]
    pub fn new(registry: RegistryConfig) -> Self {
        Self {
            registry,
            verify_invariants_after_write: false,
            track_query_stats: true,
        }
    }

    /// Config for tests: fixed admin, post-write invariant checks on.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            registry: RegistryConfig::for_testing(),
            verify_invariants_after_write: true,
            track_query_stats: true,
        }
    }
}

// =============================================================================
// SERVICE STATS
// =============================================================================

/// Statistics for the registry service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Identities newly authorized (idempotent re-grants not counted).
    pub manufacturers_authorized: u64,
    /// Identities newly revoked.
    pub manufacturers_revoked: u64,
    /// Devices successfully registered.
    pub devices_registered: u64,
    /// Ownership transfers recorded.
    pub transfers_recorded: u64,
    /// Mutations rejected with an error.
    pub rejected_operations: u64,
    /// Verification reports served (single and batch).
    pub verifications_served: u64,
    /// Post-write invariant checks that found a violation.
    pub invariant_failures: u64,
}

// =============================================================================
// REGISTRY SERVICE
// =============================================================================

/// The embeddable registry service.
///
/// Generic over the event sink and the time source so hosts pick their own
/// wiring: [`InMemoryEventBus`](crate::adapters::bus::InMemoryEventBus) +
/// [`SystemClock`](crate::adapters::clock::SystemClock) in production,
/// [`RecordingEventSink`] + [`ManualClock`] in tests.
pub struct RegistryService<S: EventSink, T: TimeSource> {
    /// Service configuration.
    config: ServiceConfig,
    /// The registry state, behind the single writer lock.
    state: Arc<RwLock<RegistryState>>,
    /// Notification sink.
    events: Arc<S>,
    /// Clock for manufacturing and transfer timestamps.
    clock: T,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<S: EventSink, T: TimeSource> RegistryService<S, T> {
    /// Create a service with fresh state from `config.registry`.
    pub fn new(config: ServiceConfig, events: S, clock: T) -> Self {
        let state = RegistryState::new(config.registry.clone());
        Self {
            config,
            state: Arc::new(RwLock::new(state)),
            events: Arc::new(events),
            clock,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Create a service from a previously captured snapshot.
    ///
    /// The `registry` section of `config` is not applied: a snapshot carries
    /// the admin, the registration policy, and every store. Only the
    /// service-level knobs in `config` take effect.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot bytes do not decode.
    pub fn from_snapshot(
        snapshot: &Snapshot,
        config: ServiceConfig,
        events: S,
        clock: T,
    ) -> Result<Self, SnapshotError> {
        let state = snapshot.restore()?;
        info!(
            digest = %snapshot.digest_hex(),
            devices = state.device_count(),
            "registry state restored from snapshot"
        );
        Ok(Self {
            config,
            state: Arc::new(RwLock::new(state)),
            events: Arc::new(events),
            clock,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// The event sink, for subscribing or inspection.
    pub fn event_sink(&self) -> &S {
        &self.events
    }

    /// The injected clock.
    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Capture a durable snapshot of the current state.
    ///
    /// Runs under the read lock: the snapshot is consistent, and writers
    /// queued behind it proceed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when encoding fails.
    pub async fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
        let state = self.state.read().await;
        let snapshot = Snapshot::capture(&state)?;
        debug!(
            bytes = snapshot.len(),
            digest = %snapshot.digest_hex(),
            "snapshot captured"
        );
        Ok(snapshot)
    }

    /// Run the full structural invariant suite against the current state.
    ///
    /// Diagnostic entry point for hosts; operations already enforce these
    /// invariants, so anything but `Valid` here means a bug.
    pub async fn check_invariants(&self) -> InvariantCheckResult {
        let state = self.state.read().await;
        check_all_invariants(&state)
    }

    /// Post-write invariant sweep, gated by config.
    async fn verify_after_write(&self, state: &RegistryState) {
        if !self.config.verify_invariants_after_write {
            return;
        }
        if let InvariantCheckResult::Invalid(violations) = check_all_invariants(state) {
            error!(?violations, "post-write invariant check failed");
            self.stats.write().await.invariant_failures += 1;
        }
    }

    async fn record_rejection(&self, error: &RegistryError) {
        warn!(error = %error, kind = ?error.kind(), "operation rejected");
        self.stats.write().await.rejected_operations += 1;
    }
}

/// Create a service on deterministic test wiring: recording sink, manual
/// clock, post-write invariant checks on.
#[must_use]
pub fn create_test_service() -> RegistryService<RecordingEventSink, ManualClock> {
    RegistryService::new(
        ServiceConfig::for_testing(),
        RecordingEventSink::new(),
        ManualClock::default(),
    )
}

// =============================================================================
// RegistryAdminApi Implementation
// =============================================================================

#[async_trait]
impl<S: EventSink, T: TimeSource> RegistryAdminApi for RegistryService<S, T> {
    #[instrument(skip(self, manufacturers), fields(caller = %caller, batch = manufacturers.len()))]
    async fn authorize_manufacturers(
        &self,
        caller: Identity,
        manufacturers: Vec<Identity>,
    ) -> Result<(), RegistryError> {
        let outcome = {
            let mut state = self.state.write().await;
            match state.authorize_manufacturers(caller, &manufacturers) {
                Ok(events) => {
                    let newly = events.len();
                    for event in events {
                        self.events.publish(event).await;
                    }
                    self.verify_after_write(&state).await;
                    Ok(newly)
                }
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok(newly) => {
                info!(requested = manufacturers.len(), newly, "manufacturers authorized");
                self.stats.write().await.manufacturers_authorized += newly as u64;
                Ok(())
            }
            Err(e) => {
                self.record_rejection(&e).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self, manufacturers), fields(caller = %caller, batch = manufacturers.len()))]
    async fn revoke_manufacturers(
        &self,
        caller: Identity,
        manufacturers: Vec<Identity>,
    ) -> Result<(), RegistryError> {
        let outcome = {
            let mut state = self.state.write().await;
            match state.revoke_manufacturers(caller, &manufacturers) {
                Ok(events) => {
                    let newly = events.len();
                    for event in events {
                        self.events.publish(event).await;
                    }
                    self.verify_after_write(&state).await;
                    Ok(newly)
                }
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok(newly) => {
                info!(requested = manufacturers.len(), newly, "manufacturers revoked");
                self.stats.write().await.manufacturers_revoked += newly as u64;
                Ok(())
            }
            Err(e) => {
                self.record_rejection(&e).await;
                Err(e)
            }
        }
    }
}

// =============================================================================
// DeviceRegistryApi Implementation
// =============================================================================

#[async_trait]
impl<S: EventSink, T: TimeSource> DeviceRegistryApi for RegistryService<S, T> {
    #[instrument(skip(self, submission), fields(caller = %caller))]
    async fn register_device(
        &self,
        caller: Identity,
        submission: DeviceSubmission,
    ) -> Result<(), RegistryError> {
        let now = self.clock.now();
        let outcome = {
            let mut state = self.state.write().await;
            match state.register_device(caller, submission, now) {
                Ok(event) => {
                    if let Some(serial) = event.serial_number() {
                        info!(serial = %serial, "device registered");
                    }
                    self.events.publish(event).await;
                    self.verify_after_write(&state).await;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok(()) => {
                self.stats.write().await.devices_registered += 1;
                Ok(())
            }
            Err(e) => {
                self.record_rejection(&e).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self, reason), fields(caller = %caller, serial, to = %to))]
    async fn transfer_ownership(
        &self,
        caller: Identity,
        serial: &str,
        to: Identity,
        reason: &str,
        price: U256,
    ) -> Result<(), RegistryError> {
        let now = self.clock.now();
        let outcome = {
            let mut state = self.state.write().await;
            match state.transfer_ownership(caller, serial, to, reason, price, now) {
                Ok(event) => {
                    info!(serial, to = %to, "ownership transferred");
                    self.events.publish(event).await;
                    self.verify_after_write(&state).await;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok(()) => {
                self.stats.write().await.transfers_recorded += 1;
                Ok(())
            }
            Err(e) => {
                self.record_rejection(&e).await;
                Err(e)
            }
        }
    }

    async fn is_authorized(&self, identity: Identity) -> bool {
        self.state.read().await.is_authorized(identity)
    }

    async fn list_authorized(&self) -> Vec<Identity> {
        self.state.read().await.list_authorized()
    }

    async fn verify_device(&self, serial: &str) -> VerificationReport {
        let report = self.state.read().await.verify_device(serial);
        if self.config.track_query_stats {
            self.stats.write().await.verifications_served += 1;
        }
        report
    }

    async fn verify_devices(&self, serials: &[String]) -> Vec<VerificationReport> {
        let reports = self.state.read().await.verify_devices(serials);
        if self.config.track_query_stats {
            self.stats.write().await.verifications_served += serials.len() as u64;
        }
        reports
    }

    async fn device_details(&self, serial: &str) -> Result<DeviceRecord, RegistryError> {
        self.state.read().await.device_details(serial).cloned()
    }

    async fn ownership_history(
        &self,
        serial: &str,
    ) -> Result<Vec<TransferRecord>, RegistryError> {
        self.state
            .read()
            .await
            .ownership_history(serial)
            .map(<[TransferRecord]>::to_vec)
    }

    async fn owner_devices(&self, owner: Identity) -> Vec<SerialNumber> {
        self.state.read().await.devices_owned_by(owner)
    }

    async fn serial_exists(&self, serial: &str) -> bool {
        self.state.read().await.serial_exists(serial)
    }

    async fn custody_state(&self, serial: &str) -> CustodyState {
        self.state.read().await.custody_state(serial)
    }

    async fn admin(&self) -> Identity {
        self.state.read().await.admin()
    }
}

// =============================================================================
// TESTS
// =============================================================================
