//! SlotBook Server Library
//!
//! Wiring for the `slotbook-server` binary: storage selection and tracing setup.

pub mod bootstrap;
pub mod telemetry;

pub use bootstrap::{BootstrapError, Result as BootstrapResult, ServerComponents, build_components};
pub use telemetry::init_tracing;
