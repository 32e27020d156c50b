use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use telemetry_protocol::TelemetryEvent;

use crate::{AmbientContext, FeatureMessage};

/// Name of the feature scope that receives telemetry events.
pub const RUM_FEATURE: &str = "rum";

/// Sink for finished events of a feature.
pub trait EventWriter {
    /// Hands the event over for storage and upload.
    fn write(&self, event: TelemetryEvent);
}

/// The storage scope of a registered feature.
pub trait FeatureScope: Send + Sync {
    /// Runs `block` with one consistent snapshot of the ambient context and a writer.
    ///
    /// Everything read from the context within the block belongs to the same snapshot, so
    /// events written by the block are consistent with it.
    fn event_write_context(&self, block: &mut dyn FnMut(&AmbientContext, &dyn EventWriter));
}

/// Provides access to the features of the SDK.
pub trait FeatureCore: Send + Sync {
    /// Returns the scope of the given feature, or `None` if it is not registered.
    fn scope(&self, feature: &str) -> Option<&dyn FeatureScope>;
}

/// A subscriber of the [`MessageBus`].
pub trait MessageReceiver: Send + Sync {
    /// Handles a message.
    ///
    /// Returns `true` if the receiver recognized the message. The return value is advisory and
    /// does not affect delivery to other receivers.
    fn receive(&self, message: &FeatureMessage, core: &dyn FeatureCore) -> bool;
}

/// Delivers messages to every registered [`MessageReceiver`].
pub struct MessageBus {
    core: Arc<dyn FeatureCore>,
    receivers: RwLock<Vec<Arc<dyn MessageReceiver>>>,
}

impl MessageBus {
    /// Creates a bus without receivers.
    pub fn new(core: Arc<dyn FeatureCore>) -> Self {
        Self {
            core,
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Appends a receiver. Receivers are invoked in registration order.
    pub fn register(&self, receiver: Arc<dyn MessageReceiver>) {
        let mut receivers = self.receivers.write();
        receivers.push(receiver);
        telemetry_log::debug!("registered message receiver #{}", receivers.len());
    }

    /// Delivers the message to all receivers.
    ///
    /// Returns `true` if at least one receiver handled the message.
    pub fn send(&self, message: impl Into<FeatureMessage>) -> bool {
        let message = message.into();

        // Clone the list so receivers may register further receivers while handling.
        let receivers = self.receivers.read().clone();

        let mut handled = false;
        for receiver in receivers {
            handled |= receiver.receive(&message, self.core.as_ref());
        }
        handled
    }

    /// Returns the number of registered receivers.
    pub fn len(&self) -> usize {
        self.receivers.read().len()
    }

    /// Returns `true` if no receiver is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("receivers", &self.len())
            .finish_non_exhaustive()
    }
}
