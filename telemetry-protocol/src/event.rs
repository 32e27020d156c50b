use serde::{Deserialize, Serialize};
use telemetry_common::UnixMillis;

use crate::{Configuration, Source};

/// The version of the telemetry payload format.
pub const FORMAT_VERSION: i64 = 2;

/// Internal metadata attached to every telemetry payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InternalMetadata {
    /// Version of the payload format.
    pub format_version: i64,
}

impl Default for InternalMetadata {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
        }
    }
}

/// The top level type of a payload. Always `telemetry`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// A telemetry event.
    #[default]
    Telemetry,
}

/// A reference to a RUM entity, serialized as `{"id": "..."}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    /// Identifier of the entity.
    pub id: String,
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self { id }
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self { id: id.to_owned() }
    }
}

/// Fields shared by all telemetry payloads, wrapping a kind-specific body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPayload<T> {
    /// Internal metadata.
    #[serde(rename = "_dd", default)]
    pub dd: InternalMetadata,

    /// Payload type.
    #[serde(rename = "type", default)]
    pub ty: EventType,

    /// Start of the event in milliseconds since the UNIX epoch, corrected to server time.
    pub date: UnixMillis,

    /// The SDK generating the telemetry.
    pub service: String,

    /// The platform the SDK runs on.
    pub source: Source,

    /// The version of the SDK generating the telemetry.
    pub version: String,

    /// The RUM application, if RUM is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Identifier>,

    /// The RUM session, if RUM is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Identifier>,

    /// The RUM view, if a view is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<Identifier>,

    /// The RUM action, if an action is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Identifier>,

    /// The kind-specific body.
    pub telemetry: T,
}

/// The kind of a telemetry body.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryType {
    /// A debug or error log.
    Log,
    /// A configuration snapshot.
    Configuration,
}

/// Severity of a log body.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    /// A debug log.
    Debug,
    /// An error log.
    Error,
}

/// Body of a [`TelemetryDebugEvent`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DebugBody {
    /// Always [`TelemetryType::Log`].
    #[serde(rename = "type")]
    pub ty: TelemetryType,
    /// Always [`LogStatus::Debug`].
    pub status: LogStatus,
    /// Body of the log.
    pub message: String,
}

impl DebugBody {
    /// Creates a debug body.
    pub fn new(message: String) -> Self {
        Self {
            ty: TelemetryType::Log,
            status: LogStatus::Debug,
            message,
        }
    }
}

/// Details of the error in a [`TelemetryErrorEvent`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// The error type or kind, or code in some cases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The stack trace or complementary information about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Body of a [`TelemetryErrorEvent`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always [`TelemetryType::Log`].
    #[serde(rename = "type")]
    pub ty: TelemetryType,
    /// Always [`LogStatus::Error`].
    pub status: LogStatus,
    /// Body of the log.
    pub message: String,
    /// Error details. Written as an empty object when neither kind nor stack is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(message: String, kind: Option<String>, stack: Option<String>) -> Self {
        Self {
            ty: TelemetryType::Log,
            status: LogStatus::Error,
            message,
            error: Some(ErrorDetails { kind, stack }),
        }
    }
}

/// Body of a [`TelemetryConfigurationEvent`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationBody {
    /// Always [`TelemetryType::Configuration`].
    #[serde(rename = "type")]
    pub ty: TelemetryType,
    /// The configuration snapshot.
    pub configuration: Configuration,
}

impl ConfigurationBody {
    /// Creates a configuration body.
    pub fn new(configuration: Configuration) -> Self {
        Self {
            ty: TelemetryType::Configuration,
            configuration,
        }
    }
}

/// A debug log emitted by the SDK.
pub type TelemetryDebugEvent = TelemetryPayload<DebugBody>;

/// An error reported by the SDK.
pub type TelemetryErrorEvent = TelemetryPayload<ErrorBody>;

/// A snapshot of the SDK configuration.
pub type TelemetryConfigurationEvent = TelemetryPayload<ConfigurationBody>;

/// A finished telemetry event, ready to be handed to a writer.
///
/// Serializes as the bare payload of the contained event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TelemetryEvent {
    /// A debug log.
    Debug(TelemetryDebugEvent),
    /// An error log.
    Error(TelemetryErrorEvent),
    /// A configuration snapshot.
    Configuration(TelemetryConfigurationEvent),
}

impl TelemetryEvent {
    /// Returns the debug payload if this is a debug event.
    pub fn as_debug(&self) -> Option<&TelemetryDebugEvent> {
        match self {
            Self::Debug(event) => Some(event),
            _ => None,
        }
    }

    /// Returns the error payload if this is an error event.
    pub fn as_error(&self) -> Option<&TelemetryErrorEvent> {
        match self {
            Self::Error(event) => Some(event),
            _ => None,
        }
    }

    /// Returns the configuration payload if this is a configuration event.
    pub fn as_configuration(&self) -> Option<&TelemetryConfigurationEvent> {
        match self {
            Self::Configuration(event) => Some(event),
            _ => None,
        }
    }

    /// Returns the date of the event.
    pub fn date(&self) -> UnixMillis {
        match self {
            Self::Debug(event) => event.date,
            Self::Error(event) => event.date,
            Self::Configuration(event) => event.date,
        }
    }

    /// Returns the RUM session id the event was recorded in, if any.
    pub fn session_id(&self) -> Option<&str> {
        let session = match self {
            Self::Debug(event) => event.session.as_ref(),
            Self::Error(event) => event.session.as_ref(),
            Self::Configuration(event) => event.session.as_ref(),
        };

        session.map(|session| session.id.as_str())
    }
}
