pub mod blocks;
pub mod fields;
pub mod list;
pub mod new;
pub mod render;
pub mod upload;

pub use blocks::blocks;
pub use fields::{fields, FieldsArgs};
pub use list::list;
pub use new::{new_page, NewArgs};
pub use render::{render, RenderArgs};
pub use upload::{upload, UploadArgs};

use pagecraft_compiler_html::RenderEngine;
use pagecraft_core::builtin::register_builtin_components;
use pagecraft_core::Registry;
use std::sync::Arc;

/// Registry holding the built-in component set
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    register_builtin_components(&mut registry);
    registry
}

pub fn builtin_engine() -> RenderEngine {
    RenderEngine::with_builtin_renderers(Arc::new(builtin_registry()))
}
