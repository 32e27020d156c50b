use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use telemetry_common::{DateProvider, UnixMillis};
use telemetry_config::{Config, DEFAULT_SERVICE};
use telemetry_protocol::{
    ConfigurationBody, ConfigurationTelemetry, DebugBody, ErrorBody, EventType, Identifier,
    InternalMetadata, Source, TelemetryEvent, TelemetryPayload,
};
use telemetry_sampling::{Sampler, Sampling};

use crate::{
    AmbientContext, EventWriter, FeatureCore, FeatureMessage, MessageReceiver, RUM_FEATURE,
    TelemetryGate, TelemetryMessage,
};

/// Admission key shared by all configuration snapshots.
const CONFIGURATION_ID: &str = "_dd.configuration";

/// Turns self-telemetry messages into events written to the RUM feature.
///
/// Every message needs to pass the [`TelemetryGate`] and the primary sampler. Configuration
/// snapshots additionally pass through a configuration sampler, which is evaluated first and
/// independently of the primary sampler.
///
/// Messages that do not pass are dropped without a trace.
pub struct TelemetryReceiver {
    date_provider: Arc<dyn DateProvider>,
    sampler: Box<dyn Sampling>,
    configuration_sampler: Box<dyn Sampling>,
    service: String,
    gate: TelemetryGate,
}

impl TelemetryReceiver {
    /// Creates a receiver with the default service and session budget.
    pub fn new(
        date_provider: Arc<dyn DateProvider>,
        sampler: impl Sampling + 'static,
        configuration_sampler: impl Sampling + 'static,
    ) -> Self {
        Self {
            date_provider,
            sampler: Box::new(sampler),
            configuration_sampler: Box::new(configuration_sampler),
            service: DEFAULT_SERVICE.to_owned(),
            gate: TelemetryGate::new(),
        }
    }

    /// Creates a receiver from the `telemetry` section of the configuration.
    pub fn from_config(config: &Config, date_provider: Arc<dyn DateProvider>) -> Self {
        let telemetry = config.telemetry();

        Self::new(
            date_provider,
            Sampler::new(telemetry.sample_rate),
            Sampler::new(telemetry.configuration_sample_rate),
        )
        .with_service(telemetry.service.clone())
        .with_budget(telemetry.max_events_per_session)
    }

    /// Sets the service tag written into events.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Sets the number of distinct events admitted per session.
    ///
    /// A budget of zero is raised to one, see [`TelemetryGate::with_budget`].
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.gate = TelemetryGate::with_budget(budget);
        self
    }

    fn debug(&self, id: &str, message: &str, core: &dyn FeatureCore) {
        self.record(id, core, |context, now| {
            TelemetryEvent::Debug(self.payload(context, now, DebugBody::new(message.to_owned())))
        });
    }

    fn error(
        &self,
        id: &str,
        message: &str,
        kind: Option<&str>,
        stack: Option<&str>,
        core: &dyn FeatureCore,
    ) {
        self.record(id, core, |context, now| {
            let body = ErrorBody::new(
                message.to_owned(),
                kind.map(str::to_owned),
                stack.map(str::to_owned),
            );
            TelemetryEvent::Error(self.payload(context, now, body))
        });
    }

    fn configuration(&self, configuration: &ConfigurationTelemetry, core: &dyn FeatureCore) {
        if !self.configuration_sampler.sample() {
            return;
        }

        self.record(CONFIGURATION_ID, core, |context, now| {
            let body = ConfigurationBody::new(configuration.clone().into());
            TelemetryEvent::Configuration(self.payload(context, now, body))
        });
    }

    /// Admits, samples and writes a single event.
    ///
    /// The gate and the event read the session from the same context snapshot.
    fn record<F>(&self, id: &str, core: &dyn FeatureCore, build: F)
    where
        F: FnOnce(&AmbientContext, DateTime<Utc>) -> TelemetryEvent,
    {
        let now = self.date_provider.now();

        let Some(scope) = core.scope(RUM_FEATURE) else {
            return;
        };

        let mut build = Some(build);
        let mut write = |context: &AmbientContext, writer: &dyn EventWriter| {
            if !self.gate.admit(id, context.session_id()) {
                return;
            }

            // A rejected sample still consumes the admitted id.
            if !self.sampler.sample() {
                return;
            }

            if let Some(build) = build.take() {
                writer.write(build(context, now));
            }
        };

        scope.event_write_context(&mut write);
    }

    fn payload<T>(
        &self,
        context: &AmbientContext,
        now: DateTime<Utc>,
        telemetry: T,
    ) -> TelemetryPayload<T> {
        let rum = context.rum.as_ref();

        TelemetryPayload {
            dd: InternalMetadata::default(),
            ty: EventType::Telemetry,
            date: UnixMillis::with_offset(now, context.server_time_offset),
            service: self.service.clone(),
            source: Source::from_tag_lossy(&context.source),
            version: context.sdk_version.clone(),
            application: rum.map(|rum| Identifier::from(rum.application_id.as_str())),
            session: rum.map(|rum| Identifier::from(rum.session_id.as_str())),
            view: rum.and_then(|rum| rum.view_id.as_deref()).map(Identifier::from),
            action: rum.and_then(|rum| rum.action_id.as_deref()).map(Identifier::from),
            telemetry,
        }
    }
}

impl MessageReceiver for TelemetryReceiver {
    fn receive(&self, message: &FeatureMessage, core: &dyn FeatureCore) -> bool {
        let FeatureMessage::Telemetry(telemetry) = message else {
            return false;
        };

        match telemetry {
            TelemetryMessage::Debug { id, message } => self.debug(id, message, core),
            TelemetryMessage::Error {
                id,
                message,
                kind,
                stack,
            } => self.error(id, message, kind.as_deref(), stack.as_deref(), core),
            TelemetryMessage::Configuration(configuration) => {
                self.configuration(configuration, core)
            }
        }

        true
    }
}

impl fmt::Debug for TelemetryReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryReceiver")
            .field("sample_rate", &self.sampler.sample_rate())
            .field(
                "configuration_sample_rate",
                &self.configuration_sampler.sample_rate(),
            )
            .field("service", &self.service)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::TimeDelta;
    use serde_json::json;
    use telemetry_common::RelativeDateProvider;
    use telemetry_config::{DEFAULT_MAX_EVENTS_PER_SESSION, TelemetryConfig};
    use telemetry_sampling::SampleRate;

    use super::*;
    use crate::testutils::PassthroughCore;
    use crate::RumContextIds;

    /// A sampler whose decision can be flipped at runtime.
    #[derive(Debug)]
    struct Toggle(Arc<AtomicBool>);

    impl Sampling for Toggle {
        fn sample(&self) -> bool {
            self.0.load(Ordering::Relaxed)
        }

        fn sample_rate(&self) -> SampleRate {
            if self.sample() {
                SampleRate::ALL
            } else {
                SampleRate::NONE
            }
        }
    }

    fn receiver() -> TelemetryReceiver {
        TelemetryReceiver::new(
            Arc::new(RelativeDateProvider::epoch()),
            Sampler::keep_all(),
            Sampler::keep_all(),
        )
    }

    fn rum_context(session_id: &str) -> AmbientContext {
        AmbientContext {
            sdk_version: "2.1.0".to_owned(),
            source: "ios".to_owned(),
            server_time_offset: TimeDelta::zero(),
            rum: Some(RumContextIds {
                application_id: "app-1".to_owned(),
                session_id: session_id.to_owned(),
                view_id: None,
                action_id: None,
            }),
        }
    }

    fn debug(id: &str, message: &str) -> FeatureMessage {
        FeatureMessage::Telemetry(TelemetryMessage::Debug {
            id: id.to_owned(),
            message: message.to_owned(),
        })
    }

    fn configuration() -> FeatureMessage {
        FeatureMessage::Telemetry(TelemetryMessage::Configuration(ConfigurationTelemetry {
            batch_size: Some(500),
            track_errors: Some(true),
            ..Default::default()
        }))
    }

    #[test]
    fn test_first_occurrence_of_each_id() {
        let receiver = receiver();
        let core = PassthroughCore::with_context(rum_context("s1"));

        for id in [0, 0, 1, 2, 3, 4, 4, 4, 4, 4, 4, 4] {
            let message = format!("message {id}");
            assert!(receiver.receive(&debug(&id.to_string(), &message), &core));
        }

        let messages: Vec<_> = core
            .debug_events()
            .into_iter()
            .map(|event| event.telemetry.message)
            .collect();

        assert_eq!(
            messages,
            ["message 0", "message 1", "message 2", "message 3", "message 4"]
        );
    }

    #[test]
    fn test_debug_event_payload() {
        let date_provider = Arc::new(RelativeDateProvider::epoch());
        date_provider.advance(TimeDelta::seconds(1_700_000_000));

        let receiver =
            TelemetryReceiver::new(date_provider, Sampler::keep_all(), Sampler::keep_all());
        let core = PassthroughCore::with_context(AmbientContext {
            sdk_version: "2.1.0".to_owned(),
            source: "flutter".to_owned(),
            server_time_offset: TimeDelta::milliseconds(1500),
            rum: Some(RumContextIds {
                application_id: "app-1".to_owned(),
                session_id: "session-1".to_owned(),
                view_id: Some("view-1".to_owned()),
                action_id: Some("action-1".to_owned()),
            }),
        });

        receiver.receive(&debug("id", "upload took too long"), &core);

        insta::assert_json_snapshot!(core.events(), @r#"
        [
          {
            "_dd": {
              "format_version": 2
            },
            "type": "telemetry",
            "date": 1700000001500,
            "service": "dd-sdk-ios",
            "source": "flutter",
            "version": "2.1.0",
            "application": {
              "id": "app-1"
            },
            "session": {
              "id": "session-1"
            },
            "view": {
              "id": "view-1"
            },
            "action": {
              "id": "action-1"
            },
            "telemetry": {
              "type": "log",
              "status": "debug",
              "message": "upload took too long"
            }
          }
        ]
        "#);
    }

    #[test]
    fn test_error_without_rum() {
        let receiver = receiver();
        let core = PassthroughCore::with_context(AmbientContext {
            sdk_version: "2.1.0".to_owned(),
            source: "tvos".to_owned(),
            ..Default::default()
        });

        let message = FeatureMessage::Telemetry(TelemetryMessage::Error {
            id: "id".to_owned(),
            message: "Oops".to_owned(),
            kind: Some("IOError".to_owned()),
            stack: Some("at upload()".to_owned()),
        });
        assert!(receiver.receive(&message, &core));

        let events = core.error_events();
        assert_eq!(events.len(), 1);

        let value = serde_json::to_value(&events[0]).unwrap();
        similar_asserts::assert_eq!(
            value,
            json!({
                "_dd": {"format_version": 2},
                "type": "telemetry",
                "date": 0,
                "service": "dd-sdk-ios",
                "source": "ios",
                "version": "2.1.0",
                "telemetry": {
                    "type": "log",
                    "status": "error",
                    "message": "Oops",
                    "error": {"kind": "IOError", "stack": "at upload()"}
                }
            })
        );
    }

    #[test]
    fn test_session_from_write_context() {
        let receiver = receiver();
        let core = PassthroughCore::with_context(rum_context("s1"));

        receiver.receive(&debug("a", "first"), &core);
        receiver.receive(&debug("a", "dropped"), &core);

        core.update_context(|context| {
            if let Some(rum) = &mut context.rum {
                rum.session_id = "s2".to_owned();
            }
        });
        receiver.receive(&debug("a", "second"), &core);

        let events = core.debug_events();
        let sessions: Vec<_> = events
            .iter()
            .map(|event| event.session.as_ref().map(|s| s.id.as_str()))
            .collect();
        assert_eq!(sessions, [Some("s1"), Some("s2")]);
        assert_eq!(events[1].telemetry.message, "second");
    }

    #[test]
    fn test_sampler_rejection_consumes_id() {
        let keep = Arc::new(AtomicBool::new(false));
        let receiver = TelemetryReceiver::new(
            Arc::new(RelativeDateProvider::epoch()),
            Toggle(keep.clone()),
            Sampler::keep_all(),
        );
        let core = PassthroughCore::with_context(rum_context("s1"));

        receiver.receive(&debug("a", "rejected"), &core);
        keep.store(true, Ordering::Relaxed);
        receiver.receive(&debug("a", "admitted before"), &core);
        receiver.receive(&debug("b", "kept"), &core);

        let messages: Vec<_> = core
            .debug_events()
            .into_iter()
            .map(|event| event.telemetry.message)
            .collect();
        assert_eq!(messages, ["kept"]);
    }

    #[test]
    fn test_session_budget() {
        let receiver = receiver();
        let core = PassthroughCore::with_context(rum_context("s1"));

        for i in 0..=DEFAULT_MAX_EVENTS_PER_SESSION {
            receiver.receive(&debug(&i.to_string(), "message"), &core);
        }
        assert_eq!(core.events().len(), DEFAULT_MAX_EVENTS_PER_SESSION);

        core.clear();
        receiver.receive(&debug("0", "message"), &core);
        assert!(core.events().is_empty());

        core.set_context(rum_context("s2"));
        receiver.receive(&debug("0", "message"), &core);
        assert_eq!(core.debug_events().len(), 1);
    }

    #[test]
    fn test_configuration_event() {
        let receiver = receiver();
        let core = PassthroughCore::with_context(rum_context("s1"));

        assert!(receiver.receive(&configuration(), &core));
        assert!(receiver.receive(&configuration(), &core));

        let events = core.configuration_events();
        assert_eq!(events.len(), 1);
        similar_asserts::assert_eq!(
            serde_json::to_value(&events[0].telemetry).unwrap(),
            json!({
                "type": "configuration",
                "configuration": {"batch_size": 500, "track_errors": true}
            })
        );
    }

    #[test]
    fn test_configuration_samplers_are_independent() {
        let core = PassthroughCore::with_context(rum_context("s1"));

        let extra_rejects = TelemetryReceiver::new(
            Arc::new(RelativeDateProvider::epoch()),
            Sampler::keep_all(),
            Sampler::reject_all(),
        );
        let primary_rejects = TelemetryReceiver::new(
            Arc::new(RelativeDateProvider::epoch()),
            Sampler::reject_all(),
            Sampler::keep_all(),
        );

        for _ in 0..10 {
            assert!(extra_rejects.receive(&configuration(), &core));
            assert!(primary_rejects.receive(&configuration(), &core));
        }

        assert!(core.events().is_empty());
    }

    #[test]
    fn test_configuration_sampler_only_applies_to_configuration() {
        let receiver = TelemetryReceiver::new(
            Arc::new(RelativeDateProvider::epoch()),
            Sampler::keep_all(),
            Sampler::reject_all(),
        );
        let core = PassthroughCore::with_context(rum_context("s1"));

        receiver.receive(&debug("a", "kept"), &core);
        assert_eq!(core.debug_events().len(), 1);
    }

    #[test]
    fn test_rum_unavailable() {
        let receiver = receiver();
        let core = PassthroughCore::without_rum();

        assert!(receiver.receive(&debug("a", "lost"), &core));
        assert!(receiver.receive(&configuration(), &core));
        assert!(core.events().is_empty());
        assert!(receiver.gate.is_empty());
    }

    #[test]
    fn test_ignores_other_messages() {
        let receiver = receiver();
        let core = PassthroughCore::new();

        let custom = FeatureMessage::Custom {
            key: "flush".to_owned(),
            baggage: json!({"force": true}),
        };
        assert!(!receiver.receive(&custom, &core));
        assert!(!receiver.receive(&FeatureMessage::Context(rum_context("s1")), &core));
        assert!(core.events().is_empty());
    }

    #[test]
    fn test_concurrent_sends() {
        let receiver = receiver();
        let core = PassthroughCore::with_context(rum_context("s1"));

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for i in 0..20 {
                        receiver.receive(&debug(&i.to_string(), "message"), &core);
                    }
                });
            }
        });

        assert_eq!(core.events().len(), 20);
    }

    #[test]
    fn test_from_config() {
        let config = Config::from_json_value(json!({
            "telemetry": {
                "sample_rate": 100,
                "configuration_sample_rate": 0,
                "max_events_per_session": 2,
                "service": "dd-sdk-flutter"
            }
        }))
        .unwrap();

        let receiver =
            TelemetryReceiver::from_config(&config, Arc::new(RelativeDateProvider::epoch()));
        let core = PassthroughCore::with_context(rum_context("s1"));

        for id in ["a", "b", "c"] {
            receiver.receive(&debug(id, "message"), &core);
        }
        receiver.receive(&configuration(), &core);

        let events = core.debug_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].service, "dd-sdk-flutter");
        assert!(core.configuration_events().is_empty());
    }

    #[test]
    fn test_default_budget() {
        assert_eq!(
            receiver().gate.budget(),
            TelemetryConfig::default().max_events_per_session
        );
    }

    #[test]
    fn test_zero_budget_still_records() {
        let receiver = receiver().with_budget(0);
        let core = PassthroughCore::with_context(rum_context("s1"));

        receiver.receive(&debug("a", "kept"), &core);
        receiver.receive(&debug("b", "over budget"), &core);

        assert_eq!(core.debug_events().len(), 1);
    }
}
