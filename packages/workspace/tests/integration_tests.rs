//! Integration tests for the page workspace
//! Tests edit → save → reload → render across storage backends

use async_trait::async_trait;
use pagecraft_compiler_html::{RenderEngine, RenderOptions};
use pagecraft_core::builtin::register_builtin_components;
use pagecraft_core::{Page, PageStatus, Registry};
use pagecraft_editor::{Mutation, MutationOutcome};
use pagecraft_workspace::{
    AssetStore, FileStorage, MemoryStorage, PageStorage, PageSummary, PageWorkspace, StorageError,
    WorkspaceConfig, WorkspaceError,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn engine() -> Arc<RenderEngine> {
    let mut registry = Registry::new();
    register_builtin_components(&mut registry);
    Arc::new(RenderEngine::with_builtin_renderers(Arc::new(registry)))
}

async fn root_id(workspace: &PageWorkspace, id: &str) -> String {
    workspace.snapshot(id).await.unwrap().root_component.id
}

async fn insert(workspace: &PageWorkspace, page_id: &str, parent_id: &str, ty: &str) -> String {
    let outcome = workspace
        .apply(
            page_id,
            Mutation::InsertNew {
                parent_id: parent_id.to_string(),
                component_type: ty.to_string(),
                overrides: Default::default(),
            },
        )
        .await
        .unwrap();

    match outcome {
        MutationOutcome::TreeChanged {
            node_id: Some(id), ..
        } => id,
        other => panic!("insert of {} failed: {:?}", ty, other),
    }
}

#[tokio::test]
async fn test_save_reload_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = Arc::new(FileStorage::new(dir.path().join("pages")));
    let workspace = PageWorkspace::new(engine(), storage.clone());

    let temp_id = workspace.create_page("About us").await?;
    assert!(temp_id.starts_with("page_"));

    let root = root_id(&workspace, &temp_id).await;
    let container = insert(&workspace, &temp_id, &root, "container").await;
    let text = insert(&workspace, &temp_id, &container, "text").await;
    workspace
        .apply(
            &temp_id,
            Mutation::SetProperty {
                node_id: text.clone(),
                path: "content".to_string(),
                value: json!("We build pages"),
            },
        )
        .await?;
    assert!(workspace.has_unsaved_changes(&temp_id).await?);

    let saved = workspace.save(&temp_id).await?;
    assert!(!saved.is_temporary());
    assert!(!workspace.is_open(&temp_id).await);
    assert!(!workspace.has_unsaved_changes(&saved.id).await?);

    // Fresh workspace over the same directory sees the same tree
    let reopened = PageWorkspace::new(engine(), storage.clone());
    let loaded = reopened.snapshot(&saved.id).await?;
    assert_eq!(loaded.root_component, saved.root_component);
    assert_eq!(loaded.slug, "about-us");

    let listing = reopened.list_pages().await?;
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, saved.id);
    assert_eq!(listing[0].title, "About us");

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("pages").join(format!("{}.json", saved.id)))?)?;
    assert_eq!(raw["rootComponent"]["children"][0]["children"][0]["props"]["content"], "We build pages");

    let html = reopened
        .render(
            &saved.id,
            &RenderOptions {
                add_scripts: false,
                ..Default::default()
            },
        )
        .await?;
    assert!(html.contains(">We build pages</p>"));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_mutations_are_serialized() -> anyhow::Result<()> {
    let workspace = Arc::new(PageWorkspace::new(engine(), Arc::new(MemoryStorage::new())));
    let id = workspace.create_page("Busy").await?;
    let root = root_id(&workspace, &id).await;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let workspace = workspace.clone();
        let id = id.clone();
        let root = root.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..10 {
                workspace
                    .apply(
                        &id,
                        Mutation::InsertNew {
                            parent_id: root.clone(),
                            component_type: "text".to_string(),
                            overrides: Default::default(),
                        },
                    )
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await?;
    }

    let page = workspace.snapshot(&id).await?;
    assert_eq!(page.root_component.children.len(), 160);

    let ids = page.root_component.collect_ids();
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());

    Ok(())
}

/// Storage that fails saves while `failing` is set
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    failing: AtomicBool,
}

#[async_trait]
impl PageStorage for FlakyStorage {
    async fn load_page(&self, id: &str) -> Result<Page, StorageError> {
        self.inner.load_page(id).await
    }

    async fn save_page(&self, page: Page) -> Result<Page, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.save_page(page).await
    }

    async fn list_pages(&self) -> Result<Vec<PageSummary>, StorageError> {
        self.inner.list_pages().await
    }

    async fn delete_page(&self, id: &str) -> Result<(), StorageError> {
        self.inner.delete_page(id).await
    }
}

#[tokio::test]
async fn test_failed_save_keeps_edits() -> anyhow::Result<()> {
    let storage = Arc::new(FlakyStorage::default());
    let workspace = PageWorkspace::new(engine(), storage.clone());
    let id = workspace.create_page("Draft").await?;
    let root = root_id(&workspace, &id).await;
    insert(&workspace, &id, &root, "image").await;

    storage.failing.store(true, Ordering::SeqCst);
    let err = workspace.save(&id).await.unwrap_err();
    assert!(matches!(err, WorkspaceError::Storage(StorageError::Unavailable(_))));

    // Still open under the temporary id with the edit intact
    let page = workspace.snapshot(&id).await?;
    assert_eq!(page.root_component.children.len(), 1);
    assert!(workspace.has_unsaved_changes(&id).await?);

    storage.failing.store(false, Ordering::SeqCst);
    let saved = workspace.save(&id).await?;
    assert_eq!(saved.root_component.children.len(), 1);
    assert!(!workspace.has_unsaved_changes(&saved.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_publish_and_delete() -> anyhow::Result<()> {
    let workspace = PageWorkspace::new(engine(), Arc::new(MemoryStorage::new()));

    let id = workspace.create_page("Launch").await?;
    let published = workspace.publish(&id).await?;
    assert_eq!(published.status, PageStatus::Published);
    assert_eq!(workspace.list_pages().await?[0].status, PageStatus::Published);

    workspace.delete_page(&published.id).await?;
    assert!(workspace.list_pages().await?.is_empty());
    assert!(!workspace.is_open(&published.id).await);

    // Unsaved drafts just close
    let draft = workspace.create_page("Scratch").await?;
    workspace.delete_page(&draft).await?;
    assert!(workspace.open_page_ids().await.is_empty());

    assert!(matches!(
        workspace.open_page("missing").await,
        Err(WorkspaceError::Storage(StorageError::NotFound(_)))
    ));

    Ok(())
}

#[tokio::test]
async fn test_uploaded_image_url_is_a_valid_src() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = WorkspaceConfig::default();
    let assets = AssetStore::from_config(&config, dir.path());
    let asset = assets.upload("hero banner.png", "image/png", b"\x89PNG\r\n").await?;
    assert!(dir.path().join("uploads").join(&asset.filename).exists());

    let workspace = PageWorkspace::new(engine(), Arc::new(MemoryStorage::new()));
    let id = workspace.create_page("Gallery").await?;
    let root = root_id(&workspace, &id).await;
    let image = insert(&workspace, &id, &root, "image").await;

    let outcome = workspace
        .apply(
            &id,
            Mutation::SetProperty {
                node_id: image,
                path: "src".to_string(),
                value: json!(asset.url),
            },
        )
        .await?;
    assert!(outcome.is_change());

    let html = workspace.render(&id, &RenderOptions::default()).await?;
    assert!(html.contains(&asset.url));

    Ok(())
}

#[tokio::test]
async fn test_workspace_sessions_support_field_drafts() -> anyhow::Result<()> {
    let workspace = PageWorkspace::new(engine(), Arc::new(MemoryStorage::new()));
    let id = workspace.create_page("Forms").await?;
    let root = root_id(&workspace, &id).await;
    let text = insert(&workspace, &id, &root, "text").await;

    let valid = workspace
        .with_session(&id, |session| {
            session
                .edit_field(&text, "style.color", json!("#12345"))
                .map(|result| result.valid)
        })
        .await??;
    assert!(!valid);

    let page = workspace.snapshot(&id).await?;
    assert_eq!(page.find_node(&text).unwrap().props["style"]["color"], "#333333");

    Ok(())
}
