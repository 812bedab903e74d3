//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the registry and the outside world.
//!
//! - **Driving Ports (Inbound)**: [`DeviceRegistryApi`](inbound::DeviceRegistryApi),
//!   [`RegistryAdminApi`](inbound::RegistryAdminApi)
//! - **Driven Ports (Outbound)**: [`TimeSource`](outbound::TimeSource),
//!   [`EventSink`](outbound::EventSink), [`StateCodec`](outbound::StateCodec)
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
