//! # Page Workspace
//!
//! Multi-client access to pages.
//!
//! Each open page is an [`EditSession`] behind its own async mutex, so
//! mutations to one page are applied one at a time while different pages
//! proceed independently. Rendering copies the page under the lock and
//! renders the copy after releasing it, so a render never observes a tree
//! mid-mutation and never blocks editors for the duration of the render.
//!
//! Saving holds the page's lock for the whole storage round trip: one
//! outstanding save per page, and a failed save leaves the in-memory page
//! and its unsaved flag exactly as they were.

use crate::error::WorkspaceError;
use crate::storage::{PageStorage, PageSummary};
use pagecraft_compiler_html::{RenderEngine, RenderOptions};
use pagecraft_core::{Page, Registry};
use pagecraft_editor::{EditSession, Mutation, MutationOutcome};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

type SharedSession = Arc<Mutex<EditSession>>;

pub struct PageWorkspace {
    engine: Arc<RenderEngine>,
    storage: Arc<dyn PageStorage>,
    open: RwLock<HashMap<String, SharedSession>>,
}

impl PageWorkspace {
    pub fn new(engine: Arc<RenderEngine>, storage: Arc<dyn PageStorage>) -> Self {
        Self {
            engine,
            storage,
            open: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Registry {
        self.engine.registry()
    }

    pub fn storage(&self) -> &Arc<dyn PageStorage> {
        &self.storage
    }

    /// Open a new blank draft page. Returns its temporary id.
    pub async fn create_page(&self, title: &str) -> Result<String, WorkspaceError> {
        let page = Page::blank(self.engine.registry(), title).ok_or(WorkspaceError::MissingRootType)?;
        let id = page.id.clone();

        let session = EditSession::new(self.engine.clone(), page);
        self.open
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));

        tracing::info!(page_id = %id, title, "Created page");
        Ok(id)
    }

    /// Session for `id`, loading the page from storage if it isn't open yet
    async fn session(&self, id: &str) -> Result<SharedSession, WorkspaceError> {
        if let Some(session) = self.open.read().await.get(id) {
            return Ok(session.clone());
        }

        let page = self.storage.load_page(id).await?;
        tracing::debug!(page_id = %id, "Opened page from storage");

        // Another task may have opened it while we were loading
        let mut open = self.open.write().await;
        let session = open
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(EditSession::new(self.engine.clone(), page))));
        Ok(session.clone())
    }

    pub async fn open_page(&self, id: &str) -> Result<(), WorkspaceError> {
        self.session(id).await.map(|_| ())
    }

    pub async fn is_open(&self, id: &str) -> bool {
        self.open.read().await.contains_key(id)
    }

    pub async fn open_page_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.open.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Apply one mutation; mutations to the same page never interleave
    pub async fn apply(&self, id: &str, mutation: Mutation) -> Result<MutationOutcome, WorkspaceError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        Ok(session.apply(mutation)?)
    }

    /// Run `f` with exclusive access to the page's session
    pub async fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut EditSession) -> R,
    ) -> Result<R, WorkspaceError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        Ok(f(&mut *session))
    }

    /// Copy of the page as of the last completed mutation
    pub async fn snapshot(&self, id: &str) -> Result<Page, WorkspaceError> {
        let session = self.session(id).await?;
        let page = session.lock().await.page().clone();
        Ok(page)
    }

    pub async fn render(&self, id: &str, options: &RenderOptions) -> Result<String, WorkspaceError> {
        let page = self.snapshot(id).await?;
        Ok(self.engine.render_page(&page, options)?)
    }

    pub async fn has_unsaved_changes(&self, id: &str) -> Result<bool, WorkspaceError> {
        let session = self.session(id).await?;
        let dirty = session.lock().await.has_unsaved_changes();
        Ok(dirty)
    }

    /// Persist the page. A temporary id is replaced by the id storage
    /// assigns, and the page stays open under the new id.
    pub async fn save(&self, id: &str) -> Result<Page, WorkspaceError> {
        let shared = self.session(id).await?;
        let mut session = shared.lock().await;

        let version = session.version();
        let saved = match self.storage.save_page(session.page().clone()).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(page_id = %id, error = %e, "Save failed; keeping unsaved edits");
                return Err(e.into());
            }
        };

        session.mark_saved(&saved.id, version);

        if saved.id != id {
            let mut open = self.open.write().await;
            if let Some(entry) = open.remove(id) {
                open.insert(saved.id.clone(), entry);
            }
        }

        Ok(saved)
    }

    pub async fn publish(&self, id: &str) -> Result<Page, WorkspaceError> {
        self.with_session(id, |session| session.publish()).await?;
        self.save(id).await
    }

    /// Drop the in-memory session. Unsaved edits are lost.
    pub async fn close_page(&self, id: &str) -> bool {
        let closed = self.open.write().await.remove(id).is_some();
        if closed {
            tracing::debug!(page_id = %id, "Closed page");
        }
        closed
    }

    pub async fn list_pages(&self) -> Result<Vec<PageSummary>, WorkspaceError> {
        Ok(self.storage.list_pages().await?)
    }

    /// Close and delete a page. A draft that was never saved only needs closing.
    pub async fn delete_page(&self, id: &str) -> Result<(), WorkspaceError> {
        let was_open = self.close_page(id).await;

        let never_saved = was_open && id.starts_with(pagecraft_core::TEMP_PAGE_PREFIX);
        if never_saved {
            return Ok(());
        }

        self.storage.delete_page(id).await?;
        Ok(())
    }
}

impl std::fmt::Debug for PageWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageWorkspace").finish_non_exhaustive()
    }
}
