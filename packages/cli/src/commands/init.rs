use crate::config::{Config, ServerOptions, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Local storage directory
    #[arg(short, long, default_value = ".blockpage")]
    pub storage_dir: String,

    /// Port for `blockpage serve`
    #[arg(short, long, default_value = "3030")]
    pub port: u16,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Blockpage project...".bright_blue().bold()
    );

    let config = Config {
        storage_dir: args.storage_dir.clone(),
        server: ServerOptions {
            port: args.port,
            ..ServerOptions::default()
        },
        ..Config::default()
    };

    let storage_dir = config.get_storage_dir(cwd);
    if !storage_dir.exists() {
        fs::create_dir_all(&storage_dir)?;
        println!("  {} Created {}/", "✓".green(), args.storage_dir);
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Optionally set {} and {} for CMS storage",
        "CONTENTFUL_SPACE_ID".cyan(),
        "CONTENTFUL_ACCESS_TOKEN".cyan()
    );
    println!("  2. Run: blockpage serve");
    println!("  3. Open http://127.0.0.1:{}/landing/page-1", args.port);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(force: bool) -> InitArgs {
        InitArgs {
            storage_dir: "data".to_string(),
            port: 4000,
            force,
        }
    }

    #[test]
    fn test_init_writes_config() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().display().to_string();

        init(args(false), &cwd).unwrap();

        assert!(dir.path().join("data").is_dir());
        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.storage_dir, "data");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.autosave.debounce_ms, 2000);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{\"historyLimit\": 7}").unwrap();

        init(args(false), &cwd).unwrap();
        assert_eq!(Config::load(&cwd).unwrap().history_limit, 7);

        init(args(true), &cwd).unwrap();
        assert_eq!(Config::load(&cwd).unwrap().history_limit, 50);
    }
}
