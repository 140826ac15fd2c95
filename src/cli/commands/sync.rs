//! Sync command: the full board-to-broker run.

use std::sync::Arc;

use console::style;

use crate::cli::helpers;
use crate::config::Settings;
use crate::discovery::Scanner;
use crate::events::EventPublisher;
use crate::pipeline::Pipeline;
use crate::reconcile::Reconciler;

pub async fn cmd_sync(settings: &Settings, dry_run: bool) -> anyhow::Result<()> {
    let ctx = helpers::open_catalog(settings).await?;
    let pipeline = Pipeline::new(
        helpers::card_source(settings)?,
        Reconciler::new(Arc::new(ctx.media())),
        Scanner::new(helpers::object_store(settings)?),
        EventPublisher::new(helpers::event_bus(settings, dry_run).await?),
    );

    let summary = pipeline.run().await?;

    println!(
        "{} {} cards: {} published, {} skipped ({} failed)",
        style("✓").green(),
        summary.cards(),
        summary.published_cards(),
        summary.skipped_cards(),
        summary.failed_cards()
    );
    println!(
        "  {} events sent, {} events failed{}",
        summary.events_published(),
        summary.events_failed(),
        if dry_run { " (dry run)" } else { "" }
    );

    Ok(())
}
