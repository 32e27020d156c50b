//! Payloads of the SDK's self-telemetry events.
//!
//! Three kinds of events exist, all sharing the [`TelemetryPayload`] envelope:
//!
//! - [`TelemetryDebugEvent`]: a debug log emitted by the SDK.
//! - [`TelemetryErrorEvent`]: an error the SDK ran into, with optional kind and stack.
//! - [`TelemetryConfigurationEvent`]: a snapshot of the SDK configuration.
//!
//! Optional fields that are absent are omitted from the serialized payload rather than
//! written as `null`.
//!
//! # Example
//!
//! ```json
//! {
//!   "_dd": { "format_version": 2 },
//!   "type": "telemetry",
//!   "date": 1700000000000,
//!   "service": "dd-sdk-ios",
//!   "source": "ios",
//!   "version": "2.1.0",
//!   "session": { "id": "d5bd2fd4-6d32-4f4b-a1ec-e8a3c1d0b6e2" },
//!   "telemetry": { "type": "log", "status": "debug", "message": "upload took too long" }
//! }
//! ```

#![warn(missing_docs)]

mod configuration;
mod event;
mod source;

pub use self::configuration::*;
pub use self::event::*;
pub use self::source::*;
