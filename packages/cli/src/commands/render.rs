use crate::config::Config;
use anyhow::{anyhow, Result};
use blockpage_compiler_html::{render_page, RenderOptions, RenderOutput};
use blockpage_persistence::{Hydration, Hydrator};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Landing page slug
    pub slug: String,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Skip pretty printing
    #[arg(long)]
    pub compact: bool,

    /// Public base URL used in structured data
    #[arg(long, default_value = "http://localhost:3000")]
    pub site_url: String,

    /// Print layout stats as JSON to stderr
    #[arg(long)]
    pub stats: bool,
}

pub async fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let (output, hydration) = render_landing(&config, cwd, &args).await?;
    let source = hydration.source;

    if args.stats {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&hydration.document.stats())?
        );
    }

    for skipped in &output.skipped {
        eprintln!(
            "  {} Skipped {} ({})",
            "⚠️".yellow(),
            skipped.id.bright_white(),
            skipped.kind
        );
    }

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, &output.html)?;
            eprintln!(
                "  {} {} → {} ({} blocks from {})",
                "✓".green(),
                args.slug,
                path.display(),
                output.rendered.len(),
                source
            );
        }
        None => print!("{}", output.html),
    }

    Ok(())
}

async fn render_landing(
    config: &Config,
    cwd: &str,
    args: &RenderArgs,
) -> Result<(RenderOutput, Hydration)> {
    let remote = config.remote_adapter()?;
    let local = config.local_adapter(cwd);

    let page = remote
        .landing_page(&args.slug)
        .await
        .ok_or_else(|| anyhow!("Landing page not found: {}", args.slug))?;

    let hydration = Hydrator::new()
        .with_remote(remote)
        .with_local(local)
        .hydrate(&args.slug)
        .await;

    let options = RenderOptions {
        pretty: !args.compact,
        site_url: args.site_url.clone(),
        ..RenderOptions::default()
    };

    let output = render_page(&page, &hydration.document, options);
    Ok((output, hydration))
}
