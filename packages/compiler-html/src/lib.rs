//! # Pagecraft HTML Compiler
//!
//! Walks a page's component tree and emits a complete HTML document.
//!
//! Each component type renders through a [`ComponentRenderer`] registered
//! on the [`RenderEngine`] under its type name; adding a component type
//! means registering a renderer. Nodes whose type is unknown to the
//! registry, or has no renderer, become an HTML comment and the rest of the
//! page renders normally.
//!
//! Plugins extend an engine with component types and renderers through
//! a [`PluginManager`].
//!
//! Rendering is pure: the same tree and options always produce the same
//! bytes.

mod compiler;
mod plugins;
mod renderers;
mod styles;


pub use compiler::{ComponentRenderer, RenderContext, RenderEngine, RenderError, RenderOptions};
pub use plugins::{Plugin, PluginError, PluginManager};
pub use renderers::{ContainerRenderer, ImageRenderer, TextRenderer, TEXT_TAGS};
pub use styles::{css_property_name, inline_style, BASE_STYLESHEET};
