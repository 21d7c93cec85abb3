//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the reporting loop: sample, filter, publish.
//! All interaction with the sensor, the broker and the clock happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
