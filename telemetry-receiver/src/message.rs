use telemetry_protocol::ConfigurationTelemetry;

use crate::AmbientContext;

/// A self-diagnostic message of the SDK.
#[derive(Clone, Debug, PartialEq)]
pub enum TelemetryMessage {
    /// A debug log.
    Debug {
        /// Deduplication key of the log.
        id: String,
        /// Body of the log.
        message: String,
    },
    /// An error the SDK ran into.
    Error {
        /// Deduplication key of the error.
        id: String,
        /// Description of the error.
        message: String,
        /// The error type, if known.
        kind: Option<String>,
        /// The stack trace, if known.
        stack: Option<String>,
    },
    /// A snapshot of the SDK configuration.
    Configuration(ConfigurationTelemetry),
}

/// A message exchanged between features over the [`MessageBus`](crate::MessageBus).
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureMessage {
    /// Self-telemetry.
    Telemetry(TelemetryMessage),
    /// A feature-specific message identified by its key.
    Custom {
        /// Key identifying the message.
        key: String,
        /// Arbitrary payload.
        baggage: serde_json::Value,
    },
    /// An update of the ambient context.
    Context(AmbientContext),
}

impl From<TelemetryMessage> for FeatureMessage {
    fn from(message: TelemetryMessage) -> Self {
        Self::Telemetry(message)
    }
}
