//! Configuration for the SDK self-telemetry channel.
//!
//! The configuration is read from a `config.yml` file in a configuration directory and can be
//! overridden through environment variables:
//!
//! ```yaml
//! logging:
//!   level: debug
//!   format: json
//! telemetry:
//!   sample_rate: 20
//!   configuration_sample_rate: 20
//!   max_events_per_session: 100
//!   service: dd-sdk-ios
//! ```
//!
//! Configuration errors are the only errors of the telemetry channel that surface to the host
//! application, and they surface at startup.

#![warn(missing_docs)]

mod config;

pub use crate::config::*;
