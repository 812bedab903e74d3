//! # Registry Events
//!
//! Notification records emitted by successful mutations, exactly once per
//! operation and never for a failed one. Hosts subscribe through the
//! [`EventSink`](crate::ports::outbound::EventSink) adapters and can narrow
//! delivery with an [`EventFilter`].

use crate::domain::value_objects::{Identity, SerialNumber};
use serde::{Deserialize, Serialize};

// =============================================================================
// EVENTS
// =============================================================================

/// All notifications the registry can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    // =========================================================================
    // AUTHORIZATION REGISTRY
    // =========================================================================
    /// An identity became an authorized manufacturer. Emitted once per NEWLY
    /// authorized identity in a batch; re-authorizing an already-authorized
    /// identity emits nothing.
    ManufacturerAuthorized {
        /// The newly authorized identity.
        manufacturer: Identity,
    },

    /// An identity lost its authorization. Emitted once per newly revoked
    /// identity in a batch. Devices it registered while authorized keep
    /// their `authentic` flag.
    ManufacturerRevoked {
        /// The newly revoked identity.
        manufacturer: Identity,
    },

    // =========================================================================
    // IDENTITY STORE
    // =========================================================================
    /// A device record was created.
    DeviceRegistered {
        /// The new record's serial number.
        serial_number: SerialNumber,
        /// The registering identity (initial owner).
        manufacturer: Identity,
    },

    // =========================================================================
    // OWNERSHIP LEDGER
    // =========================================================================
    /// Custody of a device moved.
    OwnershipTransferred {
        /// The transferred device's serial number.
        serial_number: SerialNumber,
        /// The previous owner.
        from: Identity,
        /// The new owner.
        to: Identity,
    },
}

impl RegistryEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ManufacturerAuthorized { .. } | Self::ManufacturerRevoked { .. } => {
                EventTopic::Authorization
            }
            Self::DeviceRegistered { .. } => EventTopic::Registration,
            Self::OwnershipTransferred { .. } => EventTopic::Custody,
        }
    }

    /// The serial number this event concerns, if any.
    #[must_use]
    pub fn serial_number(&self) -> Option<&SerialNumber> {
        match self {
            Self::DeviceRegistered { serial_number, .. }
            | Self::OwnershipTransferred { serial_number, .. } => Some(serial_number),
            Self::ManufacturerAuthorized { .. } | Self::ManufacturerRevoked { .. } => None,
        }
    }
}

// =============================================================================
// TOPICS & FILTERS
// =============================================================================

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Manufacturer authorization and revocation.
    Authorization,
    /// Device registration.
    Registration,
    /// Ownership transfers.
    Custody,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Serial numbers to include. Empty means all devices; events that carry
    /// no serial number (authorization) only pass when this is empty.
    pub serial_numbers: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            serial_numbers: Vec::new(),
        }
    }

    /// Create a filter that watches specific devices.
    #[must_use]
    pub fn for_serials(serial_numbers: Vec<String>) -> Self {
        Self {
            topics: Vec::new(),
            serial_numbers,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &RegistryEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let serial_match = self.serial_numbers.is_empty()
            || event
                .serial_number()
                .is_some_and(|s| self.serial_numbers.iter().any(|w| w == s.as_str()));

        topic_match && serial_match
    }
}

// =============================================================================
// TESTS
// =============================================================================
