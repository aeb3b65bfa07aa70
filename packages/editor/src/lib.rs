//! # Pagecraft Editor
//!
//! Single-user editing of one page.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ core: registry, component tree, fields      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Apply id-addressed mutations             │
//! │  - Field drafts validated per keystroke     │
//! │  - Typed change events, unsaved flag        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: page → HTML preview          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_compiler_html::RenderEngine;
//! use pagecraft_core::{builtin, Page, Registry};
//! use pagecraft_editor::{EditSession, EditorEvent};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut registry = Registry::new();
//! builtin::register_builtin_components(&mut registry);
//! let registry = Arc::new(registry);
//!
//! let page = Page::blank(&registry, "Landing").unwrap();
//! let engine = Arc::new(RenderEngine::with_builtin_renderers(registry));
//! let mut session = EditSession::new(engine, page);
//!
//! session.subscribe(|event: &EditorEvent<'_>| println!("{}", event.name()));
//!
//! let root_id = session.page().root_component.id.clone();
//! let text_id = session.insert(&root_id, "text").unwrap().unwrap();
//!
//! // Invalid input stays in the draft
//! let result = session.edit_field(&text_id, "style.color", json!("red")).unwrap();
//! assert!(!result.valid);
//!
//! session.edit_field(&text_id, "style.color", json!("#ff0000")).unwrap();
//! session.commit_edit(&text_id, "style.color").unwrap();
//!
//! assert!(session.has_unsaved_changes());
//! assert!(session.preview_html().unwrap().contains("color: #ff0000"));
//! ```

mod errors;
mod events;
mod mutations;
mod session;

pub use errors::EditorError;
pub use events::{EditorEvent, EventBus, EventListener, SubscriptionId};
pub use mutations::{Mutation, MutationError, MutationOutcome};
pub use session::EditSession;
