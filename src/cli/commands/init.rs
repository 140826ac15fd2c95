//! Initialize command.

use console::style;

use crate::cli::helpers;
use crate::config::Settings;

/// Create the catalog table and report what the database holds.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    let ctx = helpers::open_catalog(settings).await?;
    let tables = ctx.list_tables().await?;

    println!(
        "{} Catalog ready at {}",
        style("✓").green(),
        settings.display_database_url()
    );
    for table in tables {
        println!("  {}", table);
    }

    Ok(())
}
