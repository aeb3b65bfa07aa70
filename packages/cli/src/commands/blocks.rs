use super::builtin_registry;
use anyhow::Result;
use colored::Colorize;
use pagecraft_core::Registry;

pub fn blocks() -> Result<()> {
    print!("{}", palette(&builtin_registry()));
    Ok(())
}

/// Palette listing, one section per category
fn palette(registry: &Registry) -> String {
    let mut out = String::new();

    for (category, definitions) in registry.list_by_category() {
        out.push_str(&format!("{}\n", category.bright_blue().bold()));
        for definition in definitions {
            let mut line = format!("  {:<12} {}", definition.component_type, definition.label);
            if !definition.description.is_empty() {
                line.push_str(&format!(" - {}", definition.description.dimmed()));
            }
            if definition.allows_children {
                line.push_str(&format!(" {}", "[children]".dimmed()));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }

    out
}
