//! Discover command: scan storage for one title.

use console::style;

use crate::cli::helpers;
use crate::config::Settings;
use crate::discovery::Scanner;
use crate::events::EventPublisher;
use crate::models::MediaKind;

pub async fn cmd_discover(
    settings: &Settings,
    kind: MediaKind,
    media_id: &str,
    name: &str,
    publish: bool,
) -> anyhow::Result<()> {
    let scanner = Scanner::new(helpers::object_store(settings)?);
    let events = scanner.discover(kind, media_id, name).await?;

    for event in &events {
        println!(
            "  S{:02}E{:02}  {}",
            event.season, event.episode, event.object_key
        );
    }

    if !publish {
        println!(
            "{} {} files found (not published)",
            style("!").yellow(),
            events.len()
        );
        return Ok(());
    }

    let bus = helpers::event_bus(settings, false).await?;
    let publisher = EventPublisher::new(bus);
    let outcomes = publisher.publish(&events).await;
    let failed = outcomes.iter().filter(|o| o.is_err()).count();

    println!(
        "{} {} events published, {} failed",
        style("✓").green(),
        outcomes.len() - failed,
        failed
    );
    if failed > 0 {
        anyhow::bail!("{} events could not be published", failed);
    }
    Ok(())
}
