//! Discovery event publishing.

#[cfg(feature = "amqp-broker")]
mod amqp;
mod bus;
mod publisher;
pub mod wire;

#[cfg(feature = "amqp-broker")]
pub use amqp::AmqpBus;
pub use bus::{EventBus, LoggingBus, PublishError};
pub use publisher::{encode_event, EventPublisher, NEW_FILE_ROUTING_KEY};
