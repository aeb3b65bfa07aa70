//! # Pagecraft Workspace
//!
//! The collaborators around the page model: persistence, asset uploads and
//! a service that serializes edits per page for multi-client use.
//!
//! ```rust,no_run
//! use pagecraft_compiler_html::{RenderEngine, RenderOptions};
//! use pagecraft_core::{builtin, Registry};
//! use pagecraft_editor::Mutation;
//! use pagecraft_workspace::{FileStorage, PageWorkspace};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut registry = Registry::new();
//!     builtin::register_builtin_components(&mut registry);
//!     let engine = Arc::new(RenderEngine::with_builtin_renderers(Arc::new(registry)));
//!
//!     let workspace = PageWorkspace::new(engine, Arc::new(FileStorage::new("pages")));
//!     let id = workspace.create_page("Home").await?;
//!     let root_id = workspace.snapshot(&id).await?.root_component.id;
//!
//!     workspace
//!         .apply(&id, Mutation::InsertNew {
//!             parent_id: root_id,
//!             component_type: "text".to_string(),
//!             overrides: Default::default(),
//!         })
//!         .await?;
//!
//!     let saved = workspace.save(&id).await?;
//!     let html = workspace.render(&saved.id, &RenderOptions::default()).await?;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod service;
pub mod storage;

pub use assets::{AssetStore, StoredAsset, ALLOWED_CONTENT_TYPES};
pub use config::{WorkspaceConfig, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::{AssetError, StorageError, WorkspaceError};
pub use service::PageWorkspace;
pub use storage::{assign_durable_id, FileStorage, MemoryStorage, PageStorage, PageSummary};
