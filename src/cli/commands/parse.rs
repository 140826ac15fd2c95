//! Parse command: dry inspection of the board.

use console::style;

use crate::cli::helpers;
use crate::config::Settings;
use crate::parser;

/// Fetch the list and show how each card parses.
pub async fn cmd_parse(settings: &Settings) -> anyhow::Result<()> {
    let source = helpers::card_source(settings)?;

    let list = source.list().await?;
    let cards = source.cards().await?;
    println!(
        "{} cards in list '{}'",
        style(cards.len()).cyan(),
        list.name
    );

    for card in &cards {
        match parser::parse_card(card) {
            Ok(d) => println!(
                "  {} {} [{}] {} {} via {}",
                style("✓").green(),
                d.name,
                d.media_kind.as_str(),
                d.metadata_provider.as_str(),
                d.metadata_id,
                d.source_type.as_str()
            ),
            Err(e) if e.is_redundant() => {
                println!("  {} {} (season card)", style("-").dim(), card.name)
            }
            Err(e) => println!("  {} {}: {}", style("✗").red(), card.name, e),
        }
    }

    Ok(())
}
