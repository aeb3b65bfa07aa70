//! # Property Editing
//!
//! Derives a node's editable fields from its type definition and reads or
//! writes property values by path.
//!
//! Paths are either a top-level key (`content`) or one level of nesting
//! (`style.color`). Deeper paths such as `style.border.color` are not
//! supported: reads resolve to the empty string and writes leave the
//! properties untouched.
//!
//! Writes are pure: [`set_value`] returns a new mapping and never mutates
//! its input.

use crate::node::{ComponentNode, Properties};
use crate::registry::{PropertyFieldDefinition, Registry};
use crate::validation::{validate_field, ValidationResult};
use serde_json::Value;

/// A parsed property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPath<'a> {
    /// `content`
    Top(&'a str),
    /// `style.color`
    Nested { parent: &'a str, child: &'a str },
    /// More than one level of nesting
    Unsupported,
}

impl<'a> PropertyPath<'a> {
    pub fn parse(path: &'a str) -> Self {
        match path.split_once('.') {
            None => PropertyPath::Top(path),
            Some((_, child)) if child.contains('.') => PropertyPath::Unsupported,
            Some((parent, child)) => PropertyPath::Nested { parent, child },
        }
    }
}

/// Fields for a node, from its type's definition; `None` for an unknown type
pub fn editable_fields_for<'r>(
    registry: &'r Registry,
    node: &ComponentNode,
) -> Option<&'r [PropertyFieldDefinition]> {
    registry
        .get(&node.component_type)
        .map(|definition| definition.prop_editors.as_slice())
}

/// Fields sharing a group name, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup {
    pub name: String,
    pub fields: Vec<PropertyFieldDefinition>,
}

/// Group fields by their group name (default "General"), groups in first-seen order.
/// No fields yields no groups.
pub fn group_fields(fields: &[PropertyFieldDefinition]) -> Vec<FieldGroup> {
    let mut groups: Vec<FieldGroup> = Vec::new();

    for field in fields {
        let name = field.group_name();
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.fields.push(field.clone()),
            None => groups.push(FieldGroup {
                name: name.to_string(),
                fields: vec![field.clone()],
            }),
        }
    }

    groups
}

/// Value at `path`, or an empty string when it doesn't resolve
pub fn current_value(props: &Properties, path: &str) -> Value {
    let resolved = match PropertyPath::parse(path) {
        PropertyPath::Top(key) => props.get(key),
        PropertyPath::Nested { parent, child } => props
            .get(parent)
            .and_then(Value::as_object)
            .and_then(|nested| nested.get(child)),
        PropertyPath::Unsupported => None,
    };

    match resolved {
        Some(Value::Null) | None => Value::String(String::new()),
        Some(value) => value.clone(),
    }
}

/// Copy of `props` with `path` set to `value`.
///
/// For a nested path the parent object is copied and only the child key is
/// overwritten; sibling keys are kept. A parent that isn't an object is
/// replaced by a new object.
pub fn set_value(props: &Properties, path: &str, value: Value) -> Properties {
    let mut updated = props.clone();

    match PropertyPath::parse(path) {
        PropertyPath::Top(key) => {
            updated.insert(key.to_string(), value);
        }
        PropertyPath::Nested { parent, child } => {
            let mut nested = props
                .get(parent)
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            nested.insert(child.to_string(), value);
            updated.insert(parent.to_string(), Value::Object(nested));
        }
        PropertyPath::Unsupported => {
            tracing::warn!(path, "Ignoring write to unsupported nested property path");
        }
    }

    updated
}

/// In-progress edit of one field.
///
/// Every input is validated immediately; only a valid value can be
/// committed back into a node's properties. Invalid intermediate values
/// live here and never reach the node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDraft {
    field: PropertyFieldDefinition,
    value: Value,
    validation: ValidationResult,
}

impl FieldDraft {
    /// Start editing `field` from the node's current value
    pub fn begin(field: PropertyFieldDefinition, props: &Properties) -> Self {
        let value = current_value(props, &field.path);
        Self {
            field,
            value,
            validation: ValidationResult::ok(),
        }
    }

    /// Replace the pending value and re-validate it
    pub fn input(&mut self, value: Value) -> &ValidationResult {
        self.validation = validate_field(&self.field, &value);
        self.value = value;
        &self.validation
    }

    pub fn field(&self) -> &PropertyFieldDefinition {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn is_valid(&self) -> bool {
        self.validation.valid
    }

    /// Validate again and, if valid, return the updated properties
    pub fn commit(&mut self, props: &Properties) -> Result<Properties, ValidationResult> {
        self.validation = validate_field(&self.field, &self.value);
        if !self.validation.valid {
            return Err(self.validation.clone());
        }

        Ok(set_value(props, &self.field.path, self.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ComponentTypeDefinition, EditorKind};
    use serde_json::json;

    fn props() -> Properties {
        json!({
            "content": "Hello",
            "style": { "color": "#333333", "fontSize": "16px" },
            "count": 3
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_path_parsing() {
        assert_eq!(PropertyPath::parse("content"), PropertyPath::Top("content"));
        assert_eq!(
            PropertyPath::parse("style.color"),
            PropertyPath::Nested {
                parent: "style",
                child: "color"
            }
        );
        assert_eq!(
            PropertyPath::parse("style.border.color"),
            PropertyPath::Unsupported
        );
    }

    #[test]
    fn test_current_value() {
        let props = props();
        assert_eq!(current_value(&props, "content"), json!("Hello"));
        assert_eq!(current_value(&props, "count"), json!(3));
        assert_eq!(current_value(&props, "style.color"), json!("#333333"));
        assert_eq!(current_value(&props, "style.missing"), json!(""));
        assert_eq!(current_value(&props, "missing.color"), json!(""));
        assert_eq!(current_value(&props, "missing"), json!(""));
        assert_eq!(current_value(&props, "style.border.color"), json!(""));
        // Parent that isn't an object
        assert_eq!(current_value(&props, "content.length"), json!(""));
    }

    #[test]
    fn test_set_value_nested_keeps_siblings() {
        let props = props();
        let updated = set_value(&props, "style.color", json!("#ff0000"));

        assert_eq!(current_value(&updated, "style.color"), json!("#ff0000"));
        assert_eq!(current_value(&updated, "style.fontSize"), json!("16px"));
        assert_eq!(updated["content"], json!("Hello"));
        // Input untouched
        assert_eq!(current_value(&props, "style.color"), json!("#333333"));
    }

    #[test]
    fn test_set_value_creates_missing_parent() {
        let updated = set_value(&Properties::new(), "style.margin", json!("0px"));
        assert_eq!(updated["style"], json!({ "margin": "0px" }));
    }

    #[test]
    fn test_set_value_top_level_and_unsupported() {
        let props = props();
        let updated = set_value(&props, "content", json!("Bye"));
        assert_eq!(updated["content"], json!("Bye"));

        let unchanged = set_value(&props, "style.border.color", json!("red"));
        assert_eq!(unchanged, props);
    }

    #[test]
    fn test_group_fields() {
        let fields = vec![
            PropertyFieldDefinition::new("content", "Content", EditorKind::Text),
            PropertyFieldDefinition::new("style.color", "Color", EditorKind::Color).group("Style"),
            PropertyFieldDefinition::new("tag", "Tag", EditorKind::Select),
            PropertyFieldDefinition::new("style.fontSize", "Size", EditorKind::Text).group("Style"),
        ];

        let groups = group_fields(&fields);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "General");
        assert_eq!(groups[0].fields.len(), 2);
        assert_eq!(groups[1].name, "Style");
        assert_eq!(groups[1].fields[1].path, "style.fontSize");

        assert!(group_fields(&[]).is_empty());
    }

    #[test]
    fn test_editable_fields_for() {
        let mut registry = Registry::new();
        registry
            .register(
                ComponentTypeDefinition::new("text", "Text", "Basic").field(
                    PropertyFieldDefinition::new("content", "Content", EditorKind::Text),
                ),
            )
            .unwrap();

        let node = ComponentNode::new("n", "text", "Text", Properties::new());
        assert_eq!(editable_fields_for(&registry, &node).unwrap().len(), 1);

        let unknown = ComponentNode::new("u", "video", "Video", Properties::new());
        assert!(editable_fields_for(&registry, &unknown).is_none());
    }

    #[test]
    fn test_draft_holds_invalid_values_back() {
        let props = props();
        let field = PropertyFieldDefinition::new("style.color", "Color", EditorKind::Color);
        let mut draft = FieldDraft::begin(field, &props);
        assert_eq!(draft.value(), &json!("#333333"));

        assert!(!draft.input(json!("#ff")).valid);
        assert!(draft.commit(&props).is_err());

        assert!(draft.input(json!("#ff0000")).valid);
        let committed = draft.commit(&props).unwrap();
        assert_eq!(current_value(&committed, "style.color"), json!("#ff0000"));
    }
}
