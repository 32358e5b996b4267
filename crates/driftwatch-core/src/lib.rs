//! Core types and trait definitions for the driftwatch buoy monitor.
//!
//! This crate is deliberately free of I/O dependencies. All other crates
//! depend on it; it depends on nothing beyond serde and chrono.

pub mod alert;
pub mod distance;
pub mod error;
pub mod home;
pub mod record;
pub mod store;
pub mod view;

pub use error::{Error, Result};
