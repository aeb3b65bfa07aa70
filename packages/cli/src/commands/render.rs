use super::builtin_engine;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_html::RenderOptions;
use pagecraft_core::Page;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page JSON file
    pub page: PathBuf,

    /// Add data-component-id/type attributes
    #[arg(long)]
    pub editor_metadata: bool,

    /// Leave out the script block
    #[arg(long)]
    pub no_scripts: bool,

    /// Compact production output
    #[arg(long)]
    pub compact: bool,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn render(args: RenderArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let page_path = cwd.join(&args.page);

    let source = fs::read_to_string(&page_path)
        .with_context(|| format!("Cannot read page file {}", page_path.display()))?;
    let page = Page::from_json(&source)
        .with_context(|| format!("Invalid page JSON in {}", page_path.display()))?;

    let options = options_for(&config, &args);
    let html = builtin_engine().render_page(&page, &options)?;

    if args.stdout {
        println!("{}", html);
        return Ok(());
    }

    let out_dir = match args.out_dir {
        Some(ref out) => cwd.join(out),
        None => config.get_out_dir(cwd),
    };
    let output_file = out_dir.join(format!("{}.html", file_stem(&page)));

    fs::create_dir_all(&out_dir)?;
    fs::write(&output_file, html)?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        page.title.bright_white(),
        output_file.display()
    );
    Ok(())
}

/// Config defaults with command-line flags applied on top
fn options_for(config: &Config, args: &RenderArgs) -> RenderOptions {
    let mut options = config.render.clone();
    if args.editor_metadata {
        options.include_editor_metadata = true;
    }
    if args.no_scripts {
        options.add_scripts = false;
    }
    if args.compact {
        options.optimize_for_production = true;
    }
    options
}

/// Slug, or the id for pages whose title has no usable characters
fn file_stem(page: &Page) -> &str {
    if page.slug.is_empty() {
        &page.id
    } else {
        &page.slug
    }
}
