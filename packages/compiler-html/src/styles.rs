use pagecraft_core::Properties;
use serde_json::Value;

/// Layout-safety rules shared by every rendered page
pub const BASE_STYLESHEET: &[&str] = &[
    "body { margin: 0; }",
    ".wb-container { box-sizing: border-box; }",
    "#page-root :where(p, h1, h2, h3, h4, h5, h6) { margin: 0; }",
    ".wb-image { display: block; max-width: 100%; height: auto; }",
];

// Numeric values for these are emitted without a unit
const UNITLESS: &[&str] = &[
    "flex",
    "flexGrow",
    "flexShrink",
    "fontWeight",
    "lineHeight",
    "opacity",
    "order",
    "zIndex",
    "zoom",
];

/// camelCase → kebab-case; a leading capital marks a vendor prefix
pub fn css_property_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);

    for c in key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }

    name
}

fn css_value(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => {
            let is_zero = n.as_f64() == Some(0.0);
            if UNITLESS.contains(&key) || is_zero {
                Some(n.to_string())
            } else {
                Some(format!("{}px", n))
            }
        }
        _ => None,
    }
}

/// Inline CSS for a node's `style` object, `None` when nothing applies
pub fn inline_style(props: &Properties) -> Option<String> {
    let style = props.get("style")?.as_object()?;

    let declarations: Vec<String> = style
        .iter()
        .filter_map(|(key, value)| {
            css_value(key, value).map(|value| format!("{}: {}", css_property_name(key), value))
        })
        .collect();

    if declarations.is_empty() {
        None
    } else {
        Some(declarations.join("; "))
    }
}
