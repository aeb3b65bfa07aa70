use crate::config::Config;
use anyhow::Result;
use colored::Colorize;
use pagecraft_core::PageStatus;
use pagecraft_workspace::{FileStorage, PageStorage, PageSummary};
use std::path::Path;

pub async fn list(cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let storage = FileStorage::new(config.workspace.pages_path(cwd));
    let pages = storage.list_pages().await?;

    if pages.is_empty() {
        println!("{}", "⚠️  No pages found".yellow());
        return Ok(());
    }

    for page in &pages {
        println!("{}", summary_line(page));
    }
    println!();
    println!("{} pages", pages.len());

    Ok(())
}

fn summary_line(page: &PageSummary) -> String {
    let status = match page.status {
        PageStatus::Draft => "draft".yellow(),
        PageStatus::Published => "published".green(),
        PageStatus::Archived => "archived".dimmed(),
    };

    format!(
        "  {:<36}  {:<10} {} {}",
        page.id,
        status,
        page.title.bright_white(),
        page.updated_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
    )
}
