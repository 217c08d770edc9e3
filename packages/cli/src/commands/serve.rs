use crate::config::Config;
use anyhow::Result;
use blockpage_workspace::{WorkspaceServer, WorkspaceState};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Host to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Only save on explicit flush
    #[arg(long)]
    pub no_autosave: bool,
}

pub async fn serve(args: ServeArgs, cwd: &str) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_autosave {
        config.autosave.enabled = false;
    }

    let addr = config.socket_addr()?;
    let remote = config.remote_adapter()?;
    let local = config.local_adapter(cwd);

    println!(
        "{}",
        "🚀 Starting Blockpage editor API...".bright_blue().bold()
    );
    println!("   Storage:  {}", config.get_storage_dir(cwd).display());
    println!(
        "   CMS:      {}",
        if config.remote.resolve().is_some() {
            "configured".green()
        } else {
            "not configured (saving locally)".yellow()
        }
    );
    println!(
        "   Autosave: {}",
        if config.autosave.enabled {
            format!("after {}ms idle", config.autosave.debounce_ms)
        } else {
            "off".to_string()
        }
    );
    println!("   Listening on http://{}", addr.to_string().cyan());
    println!();

    let state = WorkspaceState::new(remote, local, config.session_config());
    WorkspaceServer::new(state).serve(addr).await?;

    println!("{}", "👋 Stopped".green());
    Ok(())
}
