mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    blocks, fields, list, new_page, render, upload, FieldsArgs, NewArgs, RenderArgs, UploadArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagecraft CLI - build pages from components
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new draft page
    New(NewArgs),

    /// List the component palette
    Blocks,

    /// Show the editable fields of a component type
    Fields(FieldsArgs),

    /// Render a page JSON file to HTML
    Render(RenderArgs),

    /// List stored pages
    List,

    /// Upload an asset
    Upload(UploadArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Command::New(args) => new_page(args, &cwd).await,
        Command::Blocks => blocks(),
        Command::Fields(args) => fields(args),
        Command::Render(args) => render(args, &cwd),
        Command::List => list(&cwd).await,
        Command::Upload(args) => upload(args, &cwd).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
