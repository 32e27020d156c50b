//! Routing of the SDK's self-telemetry.
//!
//! The SDK reports debug logs, errors and configuration snapshots about itself through a
//! [`MessageBus`]. The [`TelemetryReceiver`] subscribes to that bus and turns each
//! self-diagnostic message into an outbound event, guarded by:
//!
//! 1. the [`TelemetryGate`], which admits every id at most once per RUM session and at most
//!    [`DEFAULT_MAX_EVENTS_PER_SESSION`](telemetry_config::DEFAULT_MAX_EVENTS_PER_SESSION) ids
//!    per session in total,
//! 2. the primary sampler, and for configuration snapshots an additional sampler.
//!
//! Rejected messages are dropped silently. Nothing in this crate reports an error back to the
//! caller, because telemetry about the SDK must never disturb the host application.
//!
//! Finished events are handed to the RUM feature scope of a [`FeatureCore`], which is
//! responsible for storage and upload.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use telemetry_common::SystemDateProvider;
//! use telemetry_config::Config;
//! use telemetry_receiver::testutils::PassthroughCore;
//! use telemetry_receiver::{MessageBus, Telemetry, TelemetryReceiver};
//!
//! let core = Arc::new(PassthroughCore::new());
//! let bus = Arc::new(MessageBus::new(core.clone()));
//!
//! let receiver = TelemetryReceiver::from_config(&Config::default(), Arc::new(SystemDateProvider));
//! bus.register(Arc::new(receiver));
//!
//! let telemetry = Telemetry::new(bus);
//! telemetry.debug("upload took too long");
//! ```

#![warn(missing_docs)]

mod bus;
mod context;
mod gate;
mod message;
mod router;
mod telemetry;

#[cfg(any(test, feature = "test"))]
pub mod testutils;

pub use self::bus::*;
pub use self::context::*;
pub use self::gate::*;
pub use self::message::*;
pub use self::router::*;
pub use self::telemetry::*;
