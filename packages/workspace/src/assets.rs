//! # Asset Uploads
//!
//! Stores uploaded files under a directory and hands back the public URL
//! that becomes the value of an `image` property.
//!
//! Only the content types in [`ALLOWED_CONTENT_TYPES`] are accepted, up to
//! a configured size. Stored names are `<uuid>-<sanitised original name>`.

use crate::config::WorkspaceConfig;
use crate::error::AssetError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/svg+xml",
    "application/pdf",
    "text/css",
    "application/javascript",
];

/// What an upload produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAsset {
    pub url: String,
    pub filename: String,
    pub original_name: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    base_url: String,
    max_bytes: u64,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn from_config(config: &WorkspaceConfig, root: &Path) -> Self {
        Self::new(
            config.assets_path(root),
            config.asset_base_url.clone(),
            config.max_upload_bytes,
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Allow-list check; parameters such as `; charset=utf-8` are ignored
    pub fn is_allowed(content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        ALLOWED_CONTENT_TYPES.contains(&essence.as_str())
    }

    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url, filename)
    }

    pub async fn upload(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredAsset, AssetError> {
        if bytes.is_empty() {
            return Err(AssetError::Empty);
        }

        if !Self::is_allowed(content_type) {
            tracing::warn!(content_type, original_name, "Rejected upload: content type not allowed");
            return Err(AssetError::ContentTypeNotAllowed(content_type.to_string()));
        }

        let size = bytes.len() as u64;
        if size > self.max_bytes {
            tracing::warn!(size, limit = self.max_bytes, original_name, "Rejected upload: too large");
            return Err(AssetError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let filename = format!("{}-{}", uuid::Uuid::new_v4(), sanitize_file_name(original_name));
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        tracing::info!(filename = %filename, size, content_type, "Stored upload");

        Ok(StoredAsset {
            url: self.url_for(&filename),
            filename,
            original_name: original_name.to_string(),
            content_type: content_type.to_string(),
            size,
        })
    }

    pub async fn delete(&self, filename: &str) -> Result<(), AssetError> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.starts_with('.')
        {
            return Err(AssetError::InvalidName(filename.to_string()));
        }

        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => {
                tracing::info!(filename, "Deleted upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Last path component with anything outside `[A-Za-z0-9._-]` replaced by `_`
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
