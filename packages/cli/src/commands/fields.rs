use super::builtin_registry;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_core::{group_fields, ComponentTypeDefinition, EditorKind, PropertyFieldDefinition};

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Component type, e.g. `text`
    pub component_type: String,
}

pub fn fields(args: FieldsArgs) -> Result<()> {
    let registry = builtin_registry();
    let definition = registry
        .get(&args.component_type)
        .ok_or_else(|| anyhow!("Unknown component type: {}", args.component_type))?;

    print!("{}", describe(definition));
    Ok(())
}

fn describe(definition: &ComponentTypeDefinition) -> String {
    let mut out = format!(
        "{} ({})\n",
        definition.label.bright_white().bold(),
        definition.component_type
    );

    let groups = group_fields(&definition.prop_editors);
    if groups.is_empty() {
        out.push_str(&format!("  {}\n", "No editable fields".dimmed()));
        return out;
    }

    for group in groups {
        out.push_str(&format!("{}\n", group.name.bright_blue()));
        for field in &group.fields {
            out.push_str(&format!("  {}\n", describe_field(field)));
        }
    }

    out
}

fn describe_field(field: &PropertyFieldDefinition) -> String {
    let mut line = format!("{:<22} {} [{}]", field.path, field.label, field.editor);

    if field.required {
        line.push_str(" *");
    }

    if field.editor == EditorKind::Select && !field.options.is_empty() {
        let values: Vec<String> = field
            .options
            .iter()
            .map(|option| match &option.value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        line.push_str(&format!(" {}", values.join("|").dimmed()));
    }

    match (field.min, field.max) {
        (Some(min), Some(max)) => line.push_str(&format!(" {}..{}", min, max)),
        (Some(min), None) => line.push_str(&format!(" >= {}", min)),
        (None, Some(max)) => line.push_str(&format!(" <= {}", max)),
        (None, None) => {}
    }

    line
}
