mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{backups, init, render, serve, BackupsArgs, InitArgs, RenderArgs, ServeArgs};
use tracing_subscriber::EnvFilter;

/// Blockpage CLI - landing page builder backend
#[derive(Parser, Debug)]
#[command(name = "blockpage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Blockpage project
    Init(InitArgs),

    /// Run the editor HTTP API
    Serve(ServeArgs),

    /// Render a landing page to HTML
    Render(RenderArgs),

    /// List or restore local layout backups
    Backups(BackupsArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Serve(args) => serve(args, &cwd).await,
        Command::Render(args) => render(args, &cwd).await,
        Command::Backups(args) => backups(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
