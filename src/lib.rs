//! Climate reporter library.
//!
//! Exposes the pure-logic modules (filter, reporter loop, sensor protocol)
//! for integration testing, plus the Linux adapters the binary wires up.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod reading;
pub mod sensors;
