use chrono::TimeDelta;

/// Identifiers of the active RUM entities.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RumContextIds {
    /// The RUM application.
    pub application_id: String,
    /// The current RUM session.
    pub session_id: String,
    /// The active view, if any.
    pub view_id: Option<String>,
    /// The active user action, if any.
    pub action_id: Option<String>,
}

/// Context shared by all features of the SDK, read when an event is written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmbientContext {
    /// Version of the SDK.
    pub sdk_version: String,
    /// Platform tag of the SDK, e.g. `ios` or `flutter`.
    pub source: String,
    /// Offset between the device clock and the server clock.
    pub server_time_offset: TimeDelta,
    /// RUM identifiers, absent when the RUM feature is inactive.
    pub rum: Option<RumContextIds>,
}

impl AmbientContext {
    /// Returns the id of the current RUM session, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.rum.as_ref().map(|rum| rum.session_id.as_str())
    }
}
