//! Message bus abstraction.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("broker connection error: {0}")]
    Connection(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("broker rejected message for '{0}'")]
    Rejected(String),
}

/// At-least-once publish of an opaque payload under a routing key.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), PublishError>;
}

/// Bus that only logs what it would send. Used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingBus;

#[async_trait]
impl EventBus for LoggingBus {
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), PublishError> {
        info!(
            "dry run: would publish {} bytes to '{}'",
            payload.len(),
            routing_key
        );
        Ok(())
    }
}
