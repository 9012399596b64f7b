//! Seal (inkan) registration records for municipal clerks.
//!
//! The [`registry`] module carries the domain: validation of intake forms, the in-memory
//! record store, the registration service and the HTTP router built on top of it.

pub mod config;
pub mod error;
pub mod registry;
pub mod telemetry;
pub mod wareki;
