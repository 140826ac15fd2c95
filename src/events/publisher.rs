//! Publishes discovery events to the bus.

use std::sync::Arc;

use prost::Message;
use tracing::error;

use super::bus::{EventBus, PublishError};
use super::wire::IdentifyNewFile;
use crate::discovery::DiscoveryEvent;

/// Routing key reserved for new-file-discovered notifications.
pub const NEW_FILE_ROUTING_KEY: &str = "v1.identify.newfile";

/// Encode an event in the identification service's wire format.
pub fn encode_event(event: &DiscoveryEvent) -> Vec<u8> {
    IdentifyNewFile::from(event).encode_to_vec()
}

pub struct EventPublisher {
    bus: Arc<dyn EventBus>,
}

impl EventPublisher {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    /// Publish each event on its own. One failure does not stop the rest;
    /// the returned outcomes line up with `events`.
    pub async fn publish(&self, events: &[DiscoveryEvent]) -> Vec<Result<(), PublishError>> {
        let mut outcomes = Vec::with_capacity(events.len());

        for event in events {
            let payload = encode_event(event);
            let outcome = self.bus.publish(NEW_FILE_ROUTING_KEY, &payload).await;
            if let Err(ref e) = outcome {
                error!(
                    "failed to publish message for '{}': {}",
                    event.object_key, e
                );
            }
            outcomes.push(outcome);
        }

        outcomes
    }
}
