//! Card sources: where the requested titles come from.

pub(crate) mod trello;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Card, CardList};

pub use trello::TrelloClient;

#[derive(Debug, Error)]
pub enum CardSourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("board API returned {status} for {what}")]
    Status { status: u16, what: String },
}

/// Read-only provider of the cards on one list.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// The list cards are read from.
    async fn list(&self) -> Result<CardList, CardSourceError>;

    /// All cards on the list, attachments included, in board order.
    async fn cards(&self) -> Result<Vec<Card>, CardSourceError>;
}
