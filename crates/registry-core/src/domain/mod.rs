//! # Domain Layer (Inner Hexagon)
//!
//! Pure registry logic: value objects, records, the three stores, and the
//! state machine that composes them. NO I/O, NO async, NO clocks. Time
//! enters as a plain argument so every operation is deterministic and
//! replayable.
//!
//! Dependencies point INWARD only: adapters and the service depend on this
//! module, never the other way around.

pub mod authorization;
pub mod entities;
pub mod identity_store;
pub mod invariants;
pub mod ledger;
pub mod state;
pub mod value_objects;

pub use authorization::*;
pub use entities::*;
pub use identity_store::*;
pub use invariants::*;
pub use ledger::*;
pub use state::*;
pub use value_objects::*;
