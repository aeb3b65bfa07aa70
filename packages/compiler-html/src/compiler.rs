use crate::renderers::{ContainerRenderer, ImageRenderer, TextRenderer};
use crate::styles::BASE_STYLESHEET;
use pagecraft_core::builtin::{CONTAINER_TYPE, IMAGE_TYPE, TEXT_TYPE};
use pagecraft_core::visitor::{NodeVisitor, TypeCollector};
use pagecraft_core::{ComponentNode, Page, Registry, ROOT_TYPE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during HTML rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Renderer for '{component_type}' failed: {message}")]
    Renderer {
        component_type: String,
        message: String,
    },
}

/// Options for HTML rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Add `data-component-id`/`data-component-type` to every component element
    pub include_editor_metadata: bool,
    /// Minified output (implies compact)
    pub optimize_for_production: bool,
    /// Append the bootstrap script block
    pub add_scripts: bool,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// `<html lang>` value
    pub lang: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_editor_metadata: false,
            optimize_for_production: false,
            add_scripts: true,
            pretty: true,
            indent: "  ".to_string(),
            lang: "en".to_string(),
        }
    }
}

impl RenderOptions {
    /// Options used by the editor's live preview
    pub fn editor_preview() -> Self {
        Self {
            include_editor_metadata: true,
            add_scripts: false,
            ..Default::default()
        }
    }

    fn is_pretty(&self) -> bool {
        self.pretty && !self.optimize_for_production
    }
}

/// Renders one component type
pub trait ComponentRenderer: Send + Sync {
    fn render(&self, node: &ComponentNode, ctx: &mut RenderContext<'_>) -> Result<(), RenderError>;
}

/// Output buffer and position while walking a tree
pub struct RenderContext<'a> {
    engine: &'a RenderEngine,
    options: &'a RenderOptions,
    depth: usize,
    buffer: String,
}

impl<'a> RenderContext<'a> {
    fn new(engine: &'a RenderEngine, options: &'a RenderOptions) -> Self {
        Self {
            engine,
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        self.start_line();
        self.add(text);
        self.end_line();
    }

    fn start_line(&mut self) {
        if self.options.is_pretty() {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
    }

    fn end_line(&mut self) {
        if self.options.is_pretty() {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn write_open_tag(&mut self, node: &ComponentNode, tag: &str, attributes: &[(&str, String)]) {
        self.add("<");
        self.add(tag);

        for (name, value) in attributes {
            self.write_attribute(name, value);
        }

        if self.options.include_editor_metadata {
            self.write_attribute("data-component-id", &node.id);
            self.write_attribute("data-component-type", &node.component_type);
        }
    }

    fn write_attribute(&mut self, name: &str, value: &str) {
        self.add(" ");
        self.add(name);
        self.add("=\"");
        self.add(&escape_html(value));
        self.add("\"");
    }

    /// `<tag ...>text</tag>` on one line, text escaped
    pub fn text_element(
        &mut self,
        node: &ComponentNode,
        tag: &str,
        attributes: &[(&str, String)],
        text: &str,
    ) {
        self.start_line();
        self.write_open_tag(node, tag, attributes);
        self.add(">");
        self.add(&escape_html(text));
        self.add(&format!("</{}>", tag));
        self.end_line();
    }

    /// `<tag ... />`
    pub fn void_element(&mut self, node: &ComponentNode, tag: &str, attributes: &[(&str, String)]) {
        self.start_line();
        self.write_open_tag(node, tag, attributes);
        self.add(" />");
        self.end_line();
    }

    /// Wrapping element around the node's children, in child order.
    /// An empty node still emits its (empty) element.
    pub fn block_element(
        &mut self,
        node: &ComponentNode,
        tag: &str,
        attributes: &[(&str, String)],
    ) -> Result<(), RenderError> {
        self.start_line();
        self.write_open_tag(node, tag, attributes);
        self.add(">");

        if node.children.is_empty() {
            self.add(&format!("</{}>", tag));
            self.end_line();
            return Ok(());
        }

        self.end_line();
        self.indent();
        self.render_children(node)?;
        self.dedent();
        self.add_line(&format!("</{}>", tag));
        Ok(())
    }

    /// HTML comment; `text` is escaped and may come from untrusted page data
    pub fn comment(&mut self, text: &str) {
        self.add_line(&format!("<!-- {} -->", comment_text(text)));
    }

    pub fn render_children(&mut self, node: &ComponentNode) -> Result<(), RenderError> {
        for child in &node.children {
            self.render_node(child)?;
        }
        Ok(())
    }

    pub fn render_node(&mut self, node: &ComponentNode) -> Result<(), RenderError> {
        let engine = self.engine;

        match engine.renderer_for(&node.component_type) {
            Some(renderer) => renderer.render(node, self),
            None => {
                tracing::warn!(
                    node_id = %node.id,
                    component_type = %node.component_type,
                    "No renderer for component type"
                );
                self.comment(&format!("Unknown component type: {}", node.component_type));
                Ok(())
            }
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Registry-backed HTML renderer
pub struct RenderEngine {
    registry: Arc<Registry>,
    renderers: HashMap<String, Arc<dyn ComponentRenderer>>,
}

impl RenderEngine {
    /// Engine with no renderers registered
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            renderers: HashMap::new(),
        }
    }

    /// Engine with renderers for container, root, text and image
    pub fn with_builtin_renderers(registry: Arc<Registry>) -> Self {
        let mut engine = Self::new(registry);
        engine.register_renderer(CONTAINER_TYPE, ContainerRenderer::default());
        engine.register_renderer(ROOT_TYPE, ContainerRenderer::root());
        engine.register_renderer(TEXT_TYPE, TextRenderer);
        engine.register_renderer(IMAGE_TYPE, ImageRenderer);
        engine
    }

    /// Add or replace the renderer for a component type
    pub fn register_renderer(
        &mut self,
        component_type: impl Into<String>,
        renderer: impl ComponentRenderer + 'static,
    ) {
        self.renderers
            .insert(component_type.into(), Arc::new(renderer));
    }

    /// Drop the renderer for a type; returns whether one was registered
    pub fn unregister_renderer(&mut self, component_type: &str) -> bool {
        self.renderers.remove(component_type).is_some()
    }

    pub fn has_renderer(&self, component_type: &str) -> bool {
        self.renderers.contains_key(component_type)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable registry; copies it first if other owners share it
    pub fn registry_mut(&mut self) -> &mut Registry {
        Arc::make_mut(&mut self.registry)
    }

    /// Renderer for a type that is both registered and has a renderer
    fn renderer_for(&self, component_type: &str) -> Option<&Arc<dyn ComponentRenderer>> {
        if !self.registry.contains(component_type) {
            return None;
        }
        self.renderers.get(component_type)
    }

    /// Render a single subtree as an HTML fragment
    pub fn render_component(
        &self,
        node: &ComponentNode,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let mut ctx = RenderContext::new(self, options);
        ctx.render_node(node)?;
        Ok(ctx.get_output())
    }

    /// Render a complete HTML document for a page
    pub fn render_page(&self, page: &Page, options: &RenderOptions) -> Result<String, RenderError> {
        let mut types = TypeCollector::default();
        types.visit_node(&page.root_component);
        tracing::debug!(
            page_id = %page.id,
            nodes = page.root_component.count_nodes(),
            types = ?types.types,
            "Rendering page"
        );

        let mut ctx = RenderContext::new(self, options);

        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line(&format!("<html lang=\"{}\">", escape_html(&options.lang)));
        ctx.indent();

        compile_head(page, &mut ctx);

        ctx.add_line("<body>");
        ctx.indent();

        ctx.add_line("<div id=\"page-root\">");
        ctx.indent();
        ctx.render_node(&page.root_component)?;
        ctx.dedent();
        ctx.add_line("</div>");

        if options.add_scripts {
            compile_scripts(&mut ctx);
        }

        ctx.dedent();
        ctx.add_line("</body>");

        ctx.dedent();
        ctx.add_line("</html>");

        Ok(ctx.get_output())
    }
}

fn compile_head(page: &Page, ctx: &mut RenderContext<'_>) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(&page.title)));
    ctx.add_line(&format!(
        "<meta name=\"description\" content=\"{}\">",
        escape_html(&page.metadata.description)
    ));
    ctx.add_line(&format!(
        "<meta name=\"keywords\" content=\"{}\">",
        escape_html(&page.metadata.keywords)
    ));

    if ctx.options.include_editor_metadata {
        ctx.add_line("<meta name=\"generator\" content=\"Pagecraft\">");
    }

    ctx.add_line("<style>");
    ctx.indent();
    for rule in BASE_STYLESHEET {
        ctx.add_line(rule);
    }
    ctx.dedent();
    ctx.add_line("</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_scripts(ctx: &mut RenderContext<'_>) {
    ctx.add_line("<script>");
    ctx.indent();
    ctx.add_line("document.addEventListener('DOMContentLoaded', function () {");
    ctx.indent();
    ctx.add_line("document.documentElement.classList.add('wb-ready');");
    ctx.dedent();
    ctx.add_line("});");
    ctx.dedent();
    ctx.add_line("</script>");
}

/// Escaped text with no `--` run left, so it can't end the comment
fn comment_text(text: &str) -> String {
    let mut escaped = escape_html(text);
    while escaped.contains("--") {
        escaped = escaped.replace("--", "-");
    }
    escaped
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
