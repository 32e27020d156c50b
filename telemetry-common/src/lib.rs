//! Common functionality for the self-telemetry crates.

#![warn(missing_docs)]

mod time;

pub use crate::time::*;
