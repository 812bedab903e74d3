//! # Event Sink Adapters
//!
//! Two [`EventSink`] implementations:
//!
//! - [`InMemoryEventBus`] - broadcast fan-out to any number of subscribers,
//!   with per-subscription filtering. Suitable for single-process hosts;
//!   a distributed deployment would put a durable queue behind this port.
//! - [`RecordingEventSink`] - appends every event to an in-memory log.
//!   Used by tests to assert exactly-once emission, and handy as an audit
//!   tail for small hosts.

use crate::events::{EventFilter, RegistryEvent};
use crate::ports::outbound::EventSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default broadcast channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

// =============================================================================
// IN-MEMORY EVENT BUS
// =============================================================================

/// Broadcast-based event bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Subscribers that fall behind the channel capacity lose the
/// oldest events (and are told so by the subscription handle).
pub struct InMemoryEventBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<RegistryEvent>,
    /// Total events published.
    events_published: AtomicU64,
    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "new subscription created");
        Subscription {
            receiver: self.sender.subscribe(),
            filter,
        }
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// The channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for InMemoryEventBus {
    async fn publish(&self, event: RegistryEvent) -> usize {
        let topic = event.topic();

        // Counter tracks attempts, delivered or not
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(topic = ?topic, receivers = receiver_count, "event published");
                receiver_count
            }
            Err(e) => {
                warn!(topic = ?topic, error = %e, "event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// A subscription handle for receiving filtered events.
pub struct Subscription {
    receiver: broadcast::Receiver<RegistryEvent>,
    filter: EventFilter,
}

impl Subscription {
    /// Receive the next event that matches the filter.
    ///
    /// Returns `None` once the bus is dropped. If this subscriber lagged
    /// behind the channel capacity, the lag is logged and skipped.
    pub async fn recv(&mut self) -> Option<RegistryEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "subscriber lagged, events dropped");
                    continue;
                }
            };
            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Receive without blocking: `None` when no matching event is ready or
    /// the bus is gone.
    pub fn try_recv(&mut self) -> Option<RegistryEvent> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            };
            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// The filter this subscription was created with.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

// =============================================================================
// RECORDING SINK
// =============================================================================

/// Sink that appends every published event to an in-memory log.
#[derive(Default)]
pub struct RecordingEventSink {
    log: Mutex<Vec<RegistryEvent>>,
    events_published: AtomicU64,
}

impl RecordingEventSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in publication order.
    #[must_use]
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.log.lock().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    /// True iff nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    /// Drops everything recorded so far.
    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn publish(&self, event: RegistryEvent) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        self.log.lock().push(event);
        // The log itself is the one receiver
        1
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

// =============================================================================
// TESTS
// =============================================================================
