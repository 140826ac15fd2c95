//! Builds the pipeline's collaborators from settings.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::cards::{CardSource, TrelloClient};
use crate::config::Settings;
use crate::events::{EventBus, LoggingBus};
use crate::repository::DbContext;
use crate::storage::{LocalObjectStore, ObjectStore};

/// Open the catalog database and make sure the table exists.
pub async fn open_catalog(settings: &Settings) -> anyhow::Result<DbContext> {
    let ctx = DbContext::from_url(&settings.database_url).with_context(|| {
        format!(
            "failed to open catalog database {}",
            settings.display_database_url()
        )
    })?;
    ctx.init_schema()
        .await
        .context("failed to initialize catalog schema")?;
    info!("connected to catalog {}", settings.display_database_url());
    Ok(ctx)
}

pub fn card_source(settings: &Settings) -> anyhow::Result<Arc<dyn CardSource>> {
    let client = TrelloClient::new(
        &settings.trello_api_url,
        &settings.trello_app_key,
        &settings.trello_token,
        &settings.trello_list,
        settings.request_timeout(),
    )
    .context("failed to create board client")?;
    Ok(Arc::new(client))
}

pub fn object_store(settings: &Settings) -> anyhow::Result<Arc<dyn ObjectStore>> {
    if let Some(ref root) = settings.local_store {
        info!("scanning local store at {}", root.display());
        return Ok(Arc::new(LocalObjectStore::new(root)));
    }

    #[cfg(feature = "s3")]
    {
        let store = crate::storage::S3ObjectStore::new(
            &settings.s3_endpoint,
            &settings.bucket,
            &settings.s3_access_key,
            &settings.s3_secret_key,
        )
        .context("failed to configure S3 store")?;
        info!("scanning bucket '{}' at {}", store.bucket(), settings.s3_endpoint);
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "s3"))]
    {
        anyhow::bail!("no --local-store given and boardsync was built without the `s3` feature")
    }
}

pub async fn event_bus(settings: &Settings, dry_run: bool) -> anyhow::Result<Arc<dyn EventBus>> {
    if dry_run {
        return Ok(Arc::new(LoggingBus));
    }

    #[cfg(feature = "amqp-broker")]
    {
        let bus = crate::events::AmqpBus::connect(&settings.broker_url, &settings.broker_exchange)
            .await
            .context("failed to connect to message broker")?;
        bus.ensure_route(crate::events::NEW_FILE_ROUTING_KEY)
            .await
            .context("failed to declare event queue")?;
        Ok(Arc::new(bus))
    }

    #[cfg(not(feature = "amqp-broker"))]
    {
        let _ = settings;
        anyhow::bail!("boardsync was built without the `amqp-broker` feature; use --dry-run")
    }
}
