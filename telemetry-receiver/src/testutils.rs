//! Test doubles for the feature core.

use parking_lot::{Mutex, RwLock};
use telemetry_protocol::{
    TelemetryConfigurationEvent, TelemetryDebugEvent, TelemetryErrorEvent, TelemetryEvent,
};

use crate::{AmbientContext, EventWriter, FeatureCore, FeatureScope, RUM_FEATURE};

/// A feature core that records every written event in memory.
///
/// The core exposes a single scope for the RUM feature, unless created with
/// [`PassthroughCore::without_rum`].
#[derive(Debug, Default)]
pub struct PassthroughCore {
    scope: PassthroughScope,
    rum_disabled: bool,
}

impl PassthroughCore {
    /// Creates a core with a RUM scope and an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a core with the given context.
    pub fn with_context(context: AmbientContext) -> Self {
        let core = Self::new();
        core.set_context(context);
        core
    }

    /// Creates a core without a RUM scope, where every write is lost.
    pub fn without_rum() -> Self {
        Self {
            rum_disabled: true,
            ..Self::default()
        }
    }

    /// Replaces the context passed to subsequent writes.
    pub fn set_context(&self, context: AmbientContext) {
        *self.scope.context.write() = context;
    }

    /// Modifies the context passed to subsequent writes.
    pub fn update_context(&self, f: impl FnOnce(&mut AmbientContext)) {
        let mut context = self.scope.context.write();
        f(&mut *context);
    }

    /// Returns all events written so far.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.scope.events.lock().clone()
    }

    /// Returns the debug events written so far.
    pub fn debug_events(&self) -> Vec<TelemetryDebugEvent> {
        self.filter(TelemetryEvent::as_debug)
    }

    /// Returns the error events written so far.
    pub fn error_events(&self) -> Vec<TelemetryErrorEvent> {
        self.filter(TelemetryEvent::as_error)
    }

    /// Returns the configuration events written so far.
    pub fn configuration_events(&self) -> Vec<TelemetryConfigurationEvent> {
        self.filter(TelemetryEvent::as_configuration)
    }

    /// Forgets all events written so far.
    pub fn clear(&self) {
        self.scope.events.lock().clear();
    }

    fn filter<T: Clone>(&self, f: impl Fn(&TelemetryEvent) -> Option<&T>) -> Vec<T> {
        self.scope
            .events
            .lock()
            .iter()
            .filter_map(f)
            .cloned()
            .collect()
    }
}

impl FeatureCore for PassthroughCore {
    fn scope(&self, feature: &str) -> Option<&dyn FeatureScope> {
        if self.rum_disabled || feature != RUM_FEATURE {
            return None;
        }

        Some(&self.scope)
    }
}

#[derive(Debug, Default)]
struct PassthroughScope {
    context: RwLock<AmbientContext>,
    events: Mutex<Vec<TelemetryEvent>>,
}

impl FeatureScope for PassthroughScope {
    fn event_write_context(&self, block: &mut dyn FnMut(&AmbientContext, &dyn EventWriter)) {
        let context = self.context.read().clone();
        block(&context, self);
    }
}

impl EventWriter for PassthroughScope {
    fn write(&self, event: TelemetryEvent) {
        self.events.lock().push(event);
    }
}
