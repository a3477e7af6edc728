//! SmartCane firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alert;
pub mod app;
pub mod config;
pub mod fsm;
pub mod scheduler;

pub mod error;
pub mod pins;

// Hardware-facing modules carry a host simulation behind the same API so
// the crate builds and tests off-target.
pub mod adapters;
pub mod drivers;
pub mod sensors;
