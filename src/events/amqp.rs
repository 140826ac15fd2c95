//! RabbitMQ bus via lapin.

use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::{debug, info};

use super::bus::{EventBus, PublishError};

/// Persistent delivery mode.
const DELIVERY_MODE_PERSISTENT: u8 = 2;

/// Publishes with publisher confirms on a single channel.
pub struct AmqpBus {
    // Dropping the connection closes the channel.
    _connection: Connection,
    channel: Channel,
    exchange: String,
}

impl AmqpBus {
    /// Connect and open a confirm-mode channel. An empty `exchange` means the
    /// default exchange, where the routing key is the queue name.
    pub async fn connect(url: &str, exchange: &str) -> Result<Self, PublishError> {
        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|e| PublishError::Connection(e.to_string()))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| PublishError::Connection(e.to_string()))?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|e| PublishError::Connection(e.to_string()))?;

        info!("connected to message broker");
        Ok(Self {
            _connection: connection,
            channel,
            exchange: exchange.to_string(),
        })
    }

    /// Declare a durable queue for `routing_key` when publishing through the
    /// default exchange, so messages are kept until a consumer shows up.
    pub async fn ensure_route(&self, routing_key: &str) -> Result<(), PublishError> {
        if !self.exchange.is_empty() {
            return Ok(());
        }

        self.channel
            .queue_declare(
                routing_key,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| PublishError::Connection(e.to_string()))?;
        debug!("declared queue '{}'", routing_key);
        Ok(())
    }
}

#[async_trait]
impl EventBus for AmqpBus {
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), PublishError> {
        let confirm = self
            .channel
            .basic_publish(
                &self.exchange,
                routing_key,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default().with_delivery_mode(DELIVERY_MODE_PERSISTENT),
            )
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))?
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))?;

        if confirm.is_nack() {
            return Err(PublishError::Rejected(routing_key.to_string()));
        }
        Ok(())
    }
}
