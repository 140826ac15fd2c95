//! Trello REST client for reading one list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{CardSource, CardSourceError};
use crate::models::{Card, CardList};

/// Default Trello API base.
pub const DEFAULT_API_URL: &str = "https://api.trello.com/1";

pub struct TrelloClient {
    client: Client,
    api_url: String,
    app_key: String,
    token: String,
    list_id: String,
}

impl TrelloClient {
    pub fn new(
        api_url: &str,
        app_key: &str,
        token: &str,
        list_id: &str,
        timeout: Duration,
    ) -> Result<Self, CardSourceError> {
        let client = Client::builder()
            .user_agent(concat!("boardsync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            app_key: app_key.to_string(),
            token: token.to_string(),
            list_id: list_id.to_string(),
        })
    }

    fn list_url(&self) -> String {
        format!("{}/lists/{}", self.api_url, self.list_id)
    }

    fn cards_url(&self) -> String {
        format!("{}/lists/{}/cards", self.api_url, self.list_id)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CardSourceError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(&[("key", self.app_key.as_str()), ("token", self.token.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CardSourceError::Status {
                status: status.as_u16(),
                what: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CardSource for TrelloClient {
    async fn list(&self) -> Result<CardList, CardSourceError> {
        self.get_json(&self.list_url(), &[]).await
    }

    async fn cards(&self) -> Result<Vec<Card>, CardSourceError> {
        self.get_json(&self.cards_url(), &[("attachments", "true")])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = TrelloClient::new(
            "https://api.trello.com/1/",
            "key",
            "token",
            "5a651367c5be24939d689c19",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.list_url(),
            "https://api.trello.com/1/lists/5a651367c5be24939d689c19"
        );
        assert_eq!(
            client.cards_url(),
            "https://api.trello.com/1/lists/5a651367c5be24939d689c19/cards"
        );
    }
}
