//! # Integration Tests
//!
//! Flows exercised through the public service surface only: every test
//! builds a [`RegistryService`](registry_core::service::RegistryService),
//! drives it through the inbound port traits, and observes effects through
//! queries, the event sink, and snapshots. No test reaches into the domain
//! stores directly.

pub mod authorization;
pub mod lifecycle;
