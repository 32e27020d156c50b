use std::any::type_name;
use std::error::Error;
use std::panic::Location;
use std::sync::Arc;

use telemetry_log::LogError;
use telemetry_protocol::ConfigurationTelemetry;

use crate::{MessageBus, TelemetryMessage};

/// Sends self-telemetry of the SDK over the message bus.
///
/// Messages without an explicit id are keyed by the location of the call and the message, so
/// repeated reports from the same call site are only recorded once per session.
#[derive(Clone, Debug)]
pub struct Telemetry {
    bus: Option<Arc<MessageBus>>,
}

impl Telemetry {
    /// Creates a front end sending to the given bus.
    pub fn new(bus: Arc<MessageBus>) -> Self {
        Self { bus: Some(bus) }
    }

    /// Creates a front end that discards all telemetry.
    pub fn noop() -> Self {
        Self { bus: None }
    }

    /// Reports a debug log.
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        let message = message.into();
        self.debug_with_id(caller_id(Location::caller(), &message), message);
    }

    /// Reports a debug log with an explicit deduplication key.
    pub fn debug_with_id(&self, id: impl Into<String>, message: impl Into<String>) {
        self.send(TelemetryMessage::Debug {
            id: id.into(),
            message: message.into(),
        });
    }

    /// Reports an error.
    #[track_caller]
    pub fn error(&self, message: impl Into<String>, kind: Option<String>, stack: Option<String>) {
        let message = message.into();
        self.error_with_id(caller_id(Location::caller(), &message), message, kind, stack);
    }

    /// Reports an error with an explicit deduplication key.
    pub fn error_with_id(
        &self,
        id: impl Into<String>,
        message: impl Into<String>,
        kind: Option<String>,
        stack: Option<String>,
    ) {
        self.send(TelemetryMessage::Error {
            id: id.into(),
            message: message.into(),
            kind,
            stack,
        });
    }

    /// Reports an error value.
    ///
    /// The message is followed by the error and its causes, the kind is the name of the error
    /// type.
    #[track_caller]
    pub fn error_from<E: Error>(&self, message: &str, error: &E) {
        let message = format!("{message}: {}", LogError(error));
        let kind = short_type_name::<E>().to_owned();
        self.error_with_id(
            caller_id(Location::caller(), &message),
            message,
            Some(kind),
            None,
        );
    }

    /// Reports a snapshot of the SDK configuration.
    pub fn configuration(&self, configuration: ConfigurationTelemetry) {
        self.send(TelemetryMessage::Configuration(configuration));
    }

    fn send(&self, message: TelemetryMessage) {
        if let Some(bus) = &self.bus {
            bus.send(message);
        }
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::noop()
    }
}

fn caller_id(location: &Location<'_>, message: &str) -> String {
    format!("{}:{}:{}", location.file(), location.line(), message)
}

/// Returns the type name without its module path and generic parameters.
fn short_type_name<T: ?Sized>() -> &'static str {
    let name = type_name::<T>();
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::io;

    use telemetry_common::RelativeDateProvider;
    use telemetry_sampling::Sampler;

    use super::*;
    use crate::TelemetryReceiver;
    use crate::testutils::PassthroughCore;

    fn setup() -> (Arc<PassthroughCore>, Telemetry) {
        let core = Arc::new(PassthroughCore::new());
        let bus = Arc::new(MessageBus::new(core.clone()));

        bus.register(Arc::new(TelemetryReceiver::new(
            Arc::new(RelativeDateProvider::epoch()),
            Sampler::keep_all(),
            Sampler::keep_all(),
        )));

        (core, Telemetry::new(bus))
    }

    #[derive(Debug)]
    struct UploadError(io::Error);

    impl fmt::Display for UploadError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("upload failed")
        }
    }

    impl Error for UploadError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_same_call_site_dedups() {
        let (core, telemetry) = setup();

        for _ in 0..3 {
            telemetry.debug("in a loop");
        }
        telemetry.debug("in a loop");

        let events = core.debug_events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.telemetry.message == "in a loop"));
    }

    #[test]
    fn test_different_messages_are_distinct() {
        let (core, telemetry) = setup();

        for i in 0..3 {
            telemetry.debug(format!("attempt {i}"));
        }

        assert_eq!(core.debug_events().len(), 3);
    }

    #[test]
    fn test_explicit_ids() {
        let (core, telemetry) = setup();

        telemetry.debug_with_id("shared", "first");
        telemetry.debug_with_id("shared", "second");
        telemetry.error_with_id("other", "failure", None, Some("at main".to_owned()));

        let debug = core.debug_events();
        assert_eq!(debug.len(), 1);
        assert_eq!(debug[0].telemetry.message, "first");

        let errors = core.error_events();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0]
                .telemetry
                .error
                .as_ref()
                .and_then(|e| e.stack.as_deref()),
            Some("at main")
        );
    }

    #[test]
    fn test_error_from() {
        let (core, telemetry) = setup();

        let error = UploadError(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        telemetry.error_from("could not send batch", &error);

        let errors = core.error_events();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].telemetry.message,
            "could not send batch: upload failed\n  caused by: timed out"
        );
        let details = errors[0].telemetry.error.as_ref().unwrap();
        assert_eq!(details.kind.as_deref(), Some("UploadError"));
        assert_eq!(details.stack, None);
    }

    #[test]
    fn test_configuration() {
        let (core, telemetry) = setup();

        telemetry.configuration(ConfigurationTelemetry {
            use_proxy: Some(false),
            ..Default::default()
        });

        let events = core.configuration_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].telemetry.configuration.use_proxy, Some(false));
    }

    #[test]
    fn test_noop() {
        let telemetry = Telemetry::noop();
        telemetry.debug("dropped");
        telemetry.configuration(ConfigurationTelemetry::default());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<UploadError>(), "UploadError");
        assert_eq!(short_type_name::<io::Error>(), "Error");
        assert_eq!(short_type_name::<Vec<io::Error>>(), "Vec");
    }
}
