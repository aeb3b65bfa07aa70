use super::builtin_registry;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_core::Page;
use pagecraft_workspace::{FileStorage, PageStorage};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Page title
    pub title: String,

    /// Write the draft to this file instead of the pages directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub async fn new_page(args: NewArgs, cwd: &Path) -> Result<()> {
    let registry = builtin_registry();
    let page = Page::blank(&registry, args.title.as_str())
        .ok_or_else(|| anyhow!("Root component type is not registered"))?;

    match args.out {
        Some(out) => {
            let out = cwd.join(out);
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out, serde_json::to_string_pretty(&page)?)?;
            println!("  {} Draft {} → {}", "✓".green(), page.title.bright_white(), out.display());
        }
        None => {
            let config = Config::load(cwd)?;
            let storage = FileStorage::new(config.workspace.pages_path(cwd));
            let saved = storage.save_page(page).await?;
            println!(
                "  {} Created {} ({})",
                "✓".green(),
                saved.title.bright_white(),
                saved.id.dimmed()
            );
            println!("    {}", storage.dir().join(format!("{}.json", saved.id)).display());
        }
    }

    Ok(())
}
