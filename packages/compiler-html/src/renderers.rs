use crate::compiler::{ComponentRenderer, RenderContext, RenderError};
use crate::styles::inline_style;
use pagecraft_core::ComponentNode;

/// Tags a text node may render as; anything else falls back to `p`
pub const TEXT_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "span", "blockquote",
];

fn push_style(attributes: &mut Vec<(&'static str, String)>, node: &ComponentNode) {
    if let Some(style) = inline_style(&node.props) {
        attributes.push(("style", style));
    }
}

/// `div.wb-container` around the node's children. The root variant adds `wb-root`.
#[derive(Debug, Default, Clone)]
pub struct ContainerRenderer {
    root: bool,
}

impl ContainerRenderer {
    pub fn root() -> Self {
        Self { root: true }
    }
}

impl ComponentRenderer for ContainerRenderer {
    fn render(&self, node: &ComponentNode, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        let mut class = String::from("wb-container");
        if self.root {
            class.push_str(" wb-root");
        }
        let extra = node.prop_str("className");
        if !extra.trim().is_empty() {
            class.push(' ');
            class.push_str(extra.trim());
        }

        let mut attributes = vec![("class", class)];
        push_style(&mut attributes, node);

        ctx.block_element(node, "div", &attributes)
    }
}

/// Configured tag (default `p`) holding the escaped `content`
#[derive(Debug, Default, Clone)]
pub struct TextRenderer;

impl ComponentRenderer for TextRenderer {
    fn render(&self, node: &ComponentNode, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        let requested = node.prop_str("tag").trim().to_ascii_lowercase();
        let tag = TEXT_TAGS
            .iter()
            .copied()
            .find(|tag| *tag == requested)
            .unwrap_or("p");

        let mut attributes = Vec::new();
        push_style(&mut attributes, node);

        ctx.text_element(node, tag, &attributes, &node.prop_str("content"));
        Ok(())
    }
}

/// Self-closing `img.wb-image` with src/alt/style
#[derive(Debug, Default, Clone)]
pub struct ImageRenderer;

impl ComponentRenderer for ImageRenderer {
    fn render(&self, node: &ComponentNode, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        let mut attributes = vec![
            ("class", "wb-image".to_string()),
            ("src", node.prop_str("src")),
            ("alt", node.prop_str("alt")),
        ];
        push_style(&mut attributes, node);

        ctx.void_element(node, "img", &attributes);
        Ok(())
    }
}
