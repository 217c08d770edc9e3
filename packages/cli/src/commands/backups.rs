use crate::config::Config;
use anyhow::{anyhow, Result};
use blockpage_layout::PersistenceEnvelope;
use blockpage_persistence::PersistenceAdapter;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct BackupsArgs {
    /// Copy this backup back over the current layout
    #[arg(long)]
    pub restore: Option<String>,
}

pub async fn backups(args: BackupsArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let adapter = config.local_adapter(cwd);

    if let Some(key) = args.restore {
        let document = adapter
            .load_backup(&key)
            .await?
            .ok_or_else(|| anyhow!("No such backup: {}", key))?;
        let count = document.components.len();

        adapter
            .save(&PersistenceEnvelope::new("local", document))
            .await?;

        println!(
            "{} Restored {} ({} components)",
            "✓".green(),
            key.bright_white(),
            count
        );
        return Ok(());
    }

    let keys = adapter.backups().await?;
    if keys.is_empty() {
        println!(
            "No backups in {}",
            config.get_storage_dir(cwd).display().to_string().bright_white()
        );
        return Ok(());
    }

    println!("{}", "📦 Local backups (newest first)".bright_blue().bold());
    for key in keys {
        match adapter.load_backup(&key).await {
            Ok(Some(document)) => println!(
                "  {} {}  {} components, updated {}",
                "•".cyan(),
                key,
                document.components.len(),
                document.updated_at.to_rfc3339()
            ),
            Ok(None) => {}
            Err(e) => println!("  {} {}  unreadable: {}", "✗".red(), key, e),
        }
    }

    Ok(())
}
