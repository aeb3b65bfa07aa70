use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_workspace::AssetStore;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// File to upload
    pub file: PathBuf,

    /// MIME type (guessed from the extension when omitted)
    #[arg(short, long)]
    pub content_type: Option<String>,
}

pub async fn upload(args: UploadArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = cwd.join(&args.file);

    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;

    let content_type = match args.content_type {
        Some(content_type) => content_type,
        None => guess_content_type(&path)
            .ok_or_else(|| anyhow!("Cannot guess content type of {}; pass --content-type", path.display()))?
            .to_string(),
    };

    let original_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let store = AssetStore::from_config(&config.workspace, cwd);
    let asset = store.upload(&original_name, &content_type, &bytes).await?;

    println!(
        "  {} {} ({}, {} bytes)",
        "✓".green(),
        asset.original_name.bright_white(),
        asset.content_type,
        asset.size
    );
    println!("    {}", asset.url);
    Ok(())
}

fn guess_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("logo.PNG")), Some("image/png"));
        assert_eq!(guess_content_type(Path::new("a/b/photo.jpeg")), Some("image/jpeg"));
        assert_eq!(guess_content_type(Path::new("notes.txt")), None);
        assert_eq!(guess_content_type(Path::new("Makefile")), None);
    }

    #[tokio::test]
    async fn test_upload_into_assets_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.css"), "body { margin: 0 }").unwrap();

        upload(
            UploadArgs {
                file: PathBuf::from("site.css"),
                content_type: None,
            },
            dir.path(),
        )
        .await
        .unwrap();

        let stored: Vec<_> = std::fs::read_dir(dir.path().join("uploads"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].ends_with("-site.css"));
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run.sh"), "echo hi").unwrap();

        let result = upload(
            UploadArgs {
                file: PathBuf::from("run.sh"),
                content_type: Some("application/x-sh".to_string()),
            },
            dir.path(),
        )
        .await;

        assert!(result.is_err());
        assert!(!dir.path().join("uploads").exists());
    }
}
