//! # Pagecraft Core
//!
//! The in-memory model behind the page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: type name → definition            │
//! │  - default props, editable fields           │
//! │  - nesting rules (allowsChildren/max)       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ node: ComponentNode tree                    │
//! │  - create_node via registry lookup          │
//! │  - pre-order search, visitors               │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//! ┌───────────────────────┐ ┌───────────────────┐
//! │ properties/validation │ │ mutations         │
//! │  - dotted paths       │ │  - add/delete     │
//! │  - field drafts       │ │  - duplicate/move │
//! └───────────────────────┘ └───────────────────┘
//! ```
//!
//! Rendering lives in `pagecraft-compiler-html`; editing sessions and
//! persistence live in `pagecraft-editor` and `pagecraft-workspace`.
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_core::{builtin, create_node, mutations, Registry};
//! use serde_json::json;
//!
//! let mut registry = Registry::new();
//! builtin::register_builtin_components(&mut registry);
//!
//! let mut root = create_node(&registry, "container", Default::default()).unwrap();
//! let mut overrides = serde_json::Map::new();
//! overrides.insert("content".to_string(), json!("Hello"));
//! let text = create_node(&registry, "text", overrides).unwrap();
//!
//! assert!(mutations::add_child(&registry, &mut root, text));
//! assert_eq!(root.children.len(), 1);
//! ```

pub mod builtin;
pub mod id_generator;
pub mod mutations;
pub mod node;
pub mod page;
pub mod properties;
pub mod registry;
pub mod validation;
pub mod visitor;

pub use id_generator::{generate_component_id, generate_page_id, TEMP_PAGE_PREFIX};
pub use mutations::{ChangeObserver, TreeEditor};
pub use node::{create_node, find_node, ComponentNode, Properties, MAX_TREE_DEPTH};
pub use page::{slugify, Page, PageMetadata, PageStatus, MAX_JSON_NESTING};
pub use properties::{
    current_value, editable_fields_for, group_fields, set_value, FieldDraft, FieldGroup,
    PropertyPath,
};
pub use registry::{
    ComponentTypeDefinition, EditorKind, PropertyFieldDefinition, Registry, RegistryError,
    SelectOption, DEFAULT_FIELD_GROUP, ROOT_CATEGORY, ROOT_TYPE,
};
pub use validation::{validate, validate_field, ValidationResult};
pub use visitor::{NodeVisitor, NodeVisitorMut};
