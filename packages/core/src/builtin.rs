//! Built-in component types: container, text, image and the page root.

use crate::registry::{
    ComponentTypeDefinition, EditorKind, PropertyFieldDefinition, Registry, ROOT_CATEGORY,
    ROOT_TYPE,
};
use serde_json::json;

pub const CONTAINER_TYPE: &str = "container";
pub const TEXT_TYPE: &str = "text";
pub const IMAGE_TYPE: &str = "image";

const PLACEHOLDER_IMAGE: &str = "https://image-placeholder.com/images/actual-size/320x200.png";

pub fn container() -> ComponentTypeDefinition {
    ComponentTypeDefinition::new(CONTAINER_TYPE, "Container", "Layout")
        .icon("box")
        .description("A block that groups other components")
        .default_prop(
            "style",
            json!({
                "padding": "20px",
                "margin": "0px",
                "minHeight": "100px",
                "backgroundColor": "#ffffff",
            }),
        )
        .default_prop("className", "")
        .field(
            PropertyFieldDefinition::new("style.padding", "Padding", EditorKind::Text)
                .group("Layout")
                .default_value("20px"),
        )
        .field(
            PropertyFieldDefinition::new("style.backgroundColor", "Background color", EditorKind::Color)
                .group("Appearance")
                .default_value("#ffffff"),
        )
        .field(
            PropertyFieldDefinition::new("className", "CSS classes", EditorKind::Text)
                .description("Extra class names added to the container")
                .default_value(""),
        )
        .allows_children(true)
}

pub fn text() -> ComponentTypeDefinition {
    let mut tag = PropertyFieldDefinition::new("tag", "HTML tag", EditorKind::Select)
        .option("p", "Paragraph (p)")
        .default_value("p");
    for level in 1..=6 {
        tag = tag.option(format!("h{}", level), format!("Heading {} (h{})", level, level));
    }

    ComponentTypeDefinition::new(TEXT_TYPE, "Text", "Basic")
        .icon("type")
        .description("A paragraph or heading")
        .default_prop("content", "Sample text")
        .default_prop("tag", "p")
        .default_prop(
            "style",
            json!({
                "fontSize": "16px",
                "color": "#333333",
                "fontWeight": "normal",
            }),
        )
        .field(
            PropertyFieldDefinition::new("content", "Content", EditorKind::Text)
                .default_value("Sample text"),
        )
        .field(tag)
        .field(
            PropertyFieldDefinition::new("style.fontSize", "Font size", EditorKind::Text)
                .group("Typography")
                .default_value("16px"),
        )
        .field(
            PropertyFieldDefinition::new("style.color", "Text color", EditorKind::Color)
                .group("Typography")
                .default_value("#333333"),
        )
        .field(
            PropertyFieldDefinition::new("style.fontWeight", "Font weight", EditorKind::Select)
                .group("Typography")
                .option("normal", "Normal")
                .option("bold", "Bold")
                .option("300", "Light (300)")
                .option("500", "Medium (500)")
                .option("700", "Bold (700)")
                .default_value("normal"),
        )
}

pub fn image() -> ComponentTypeDefinition {
    ComponentTypeDefinition::new(IMAGE_TYPE, "Image", "Basic")
        .icon("image")
        .description("An image loaded from a URL")
        .default_prop("src", PLACEHOLDER_IMAGE)
        .default_prop("alt", "Sample image")
        .default_prop("style", json!({ "width": "100%", "height": "auto" }))
        .field(
            PropertyFieldDefinition::new("src", "Image URL", EditorKind::Image)
                .required()
                .default_value(PLACEHOLDER_IMAGE),
        )
        .field(
            PropertyFieldDefinition::new("alt", "Alternative text", EditorKind::Text)
                .default_value("Sample image"),
        )
        .field(
            PropertyFieldDefinition::new("style.maxWidth", "Max width", EditorKind::Text)
                .group("Layout")
                .default_value("100%"),
        )
}

/// The invisible root every page tree hangs from
pub fn root() -> ComponentTypeDefinition {
    ComponentTypeDefinition::new(ROOT_TYPE, "Page", ROOT_CATEGORY)
        .icon("box")
        .allows_children(true)
}

pub fn register_builtin_components(registry: &mut Registry) {
    for definition in [container(), text(), image(), root()] {
        // Built-in keys are never empty
        let _ = registry.register(definition);
    }
}
