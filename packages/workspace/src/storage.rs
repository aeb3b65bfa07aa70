//! # Page Storage
//!
//! Async persistence for pages behind the [`PageStorage`] trait.
//!
//! Pages created by the editor carry a temporary `page_` id. Every backend
//! replaces it with a durable uuid on the first successful save and returns
//! the stored page so the caller can pick up the new id.
//!
//! Listings are ordered most recently updated first.

use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_core::{Page, PageStatus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::sync::{Mutex, RwLock};

const INDEX_FILE: &str = "index.json";

/// Listing entry for a stored page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub status: PageStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<&Page> for PageSummary {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            title: page.title.clone(),
            slug: page.slug.clone(),
            status: page.status,
            updated_at: page.metadata.updated_at,
        }
    }
}

/// Persistence backend for pages
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// open page.
#[async_trait]
pub trait PageStorage: Send + Sync {
    async fn load_page(&self, id: &str) -> Result<Page, StorageError>;

    /// Store `page`, assigning a durable id if it still has a temporary one
    async fn save_page(&self, page: Page) -> Result<Page, StorageError>;

    async fn list_pages(&self) -> Result<Vec<PageSummary>, StorageError>;

    async fn delete_page(&self, id: &str) -> Result<(), StorageError>;
}

/// Swap a temporary id for a fresh uuid
pub fn assign_durable_id(page: &mut Page) {
    if page.is_temporary() {
        let id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(temporary_id = %page.id, id = %id, "Assigning durable page id");
        page.id = id;
    }
}

fn sort_summaries(summaries: &mut [PageSummary]) {
    summaries.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// In-process storage, mostly for tests and previews
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pages: RwLock<HashMap<String, Page>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageStorage for MemoryStorage {
    async fn load_page(&self, id: &str) -> Result<Page, StorageError> {
        self.pages
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn save_page(&self, mut page: Page) -> Result<Page, StorageError> {
        assign_durable_id(&mut page);
        self.pages
            .write()
            .await
            .insert(page.id.clone(), page.clone());
        Ok(page)
    }

    async fn list_pages(&self) -> Result<Vec<PageSummary>, StorageError> {
        let mut summaries: Vec<PageSummary> =
            self.pages.read().await.values().map(PageSummary::from).collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn delete_page(&self, id: &str) -> Result<(), StorageError> {
        match self.pages.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }
}

fn valid_page_id() -> &'static Regex {
    static PAGE_ID: OnceLock<Regex> = OnceLock::new();
    PAGE_ID.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").expect("valid regex"))
}

/// One pretty-printed JSON file per page plus an `index.json` listing
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    // Serializes index read-modify-write cycles
    index_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            index_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn page_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        if !valid_page_id().is_match(id) || format!("{}.json", id) == INDEX_FILE {
            return Err(StorageError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    async fn read_index(&self) -> Result<Vec<PageSummary>, StorageError> {
        match tokio::fs::read_to_string(self.index_path()).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_index(&self, mut summaries: Vec<PageSummary>) -> Result<(), StorageError> {
        sort_summaries(&mut summaries);
        let json = serde_json::to_string_pretty(&summaries)?;
        write_atomic(&self.index_path(), json.as_bytes()).await
    }
}

/// Write through a sibling temp file so readers never see a partial file
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl PageStorage for FileStorage {
    async fn load_page(&self, id: &str) -> Result<Page, StorageError> {
        let path = self.page_path(id)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let page = Page::from_json(&content)?;
        tracing::debug!(page_id = %id, path = %path.display(), "Loaded page");
        Ok(page)
    }

    async fn save_page(&self, mut page: Page) -> Result<Page, StorageError> {
        assign_durable_id(&mut page);
        let path = self.page_path(&page.id)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(&page)?;
        write_atomic(&path, json.as_bytes()).await?;

        let _guard = self.index_lock.lock().await;
        let mut index = self.read_index().await?;
        index.retain(|summary| summary.id != page.id);
        index.push(PageSummary::from(&page));
        self.write_index(index).await?;

        tracing::info!(page_id = %page.id, title = %page.title, "Saved page");
        Ok(page)
    }

    async fn list_pages(&self) -> Result<Vec<PageSummary>, StorageError> {
        let _guard = self.index_lock.lock().await;
        let mut index = self.read_index().await?;
        sort_summaries(&mut index);
        Ok(index)
    }

    async fn delete_page(&self, id: &str) -> Result<(), StorageError> {
        let path = self.page_path(id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        let _guard = self.index_lock.lock().await;
        let mut index = self.read_index().await?;
        index.retain(|summary| summary.id != id);
        self.write_index(index).await?;

        tracing::info!(page_id = %id, "Deleted page");
        Ok(())
    }
}
