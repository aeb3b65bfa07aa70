//! # Component Registry
//!
//! Maps a component type name to its definition: default properties,
//! editable fields and nesting rules.
//!
//! Registrations are keyed by `type`. Re-registering a key replaces the
//! definition in place (last writer wins) and keeps its original position
//! in the listing order.

use crate::node::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Category of the invisible root type, never shown in a palette
pub const ROOT_CATEGORY: &str = "main";

/// Type name anchoring every page tree
pub const ROOT_TYPE: &str = "container-root";

/// Group used for fields that don't name one
pub const DEFAULT_FIELD_GROUP: &str = "General";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Component type key must not be empty")]
    EmptyType,
}

/// UI control category for a property field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    Text,
    Number,
    Color,
    Select,
    Toggle,
    Image,
}

impl EditorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorKind::Text => "text",
            EditorKind::Number => "number",
            EditorKind::Color => "color",
            EditorKind::Select => "select",
            EditorKind::Toggle => "toggle",
            EditorKind::Image => "image",
        }
    }
}

impl std::fmt::Display for EditorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One editable property of a component type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFieldDefinition {
    /// Dot-separated property path, e.g. `style.color`
    #[serde(alias = "propName")]
    pub path: String,

    pub label: String,

    #[serde(alias = "editorType")]
    pub editor: EditorKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl PropertyFieldDefinition {
    pub fn new(path: impl Into<String>, label: impl Into<String>, editor: EditorKind) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            editor,
            group: None,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            required: false,
            description: String::new(),
            default_value: None,
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self.step = step;
        self
    }

    pub fn option(mut self, value: impl Into<Value>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label));
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Group name, falling back to [`DEFAULT_FIELD_GROUP`]
    pub fn group_name(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_FIELD_GROUP)
    }
}

/// Registry entry describing a component type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTypeDefinition {
    #[serde(rename = "type")]
    pub component_type: String,

    pub label: String,

    pub category: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub default_props: Properties,

    #[serde(default)]
    pub prop_editors: Vec<PropertyFieldDefinition>,

    #[serde(default, alias = "allowChildren")]
    pub allows_children: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_children: Option<usize>,
}

impl ComponentTypeDefinition {
    pub fn new(
        component_type: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            component_type: component_type.into(),
            label: label.into(),
            category: category.into(),
            description: String::new(),
            icon: String::new(),
            default_props: Properties::new(),
            prop_editors: Vec::new(),
            allows_children: false,
            max_children: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn default_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_props.insert(key.into(), value.into());
        self
    }

    pub fn field(mut self, field: PropertyFieldDefinition) -> Self {
        self.prop_editors.push(field);
        self
    }

    pub fn allows_children(mut self, allows: bool) -> Self {
        self.allows_children = allows;
        self
    }

    pub fn max_children(mut self, max: usize) -> Self {
        self.max_children = Some(max);
        self
    }

    /// Whether a node of this type may take one more child given its current count
    pub fn accepts_child(&self, current_children: usize) -> bool {
        self.allows_children && self.max_children.map_or(true, |max| current_children < max)
    }
}

/// Explicitly constructed registry of component types
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: Vec<ComponentTypeDefinition>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a definition keyed by its type
    pub fn register(&mut self, definition: ComponentTypeDefinition) -> Result<(), RegistryError> {
        if definition.component_type.is_empty() {
            return Err(RegistryError::EmptyType);
        }

        match self.index.get(&definition.component_type) {
            Some(&position) => {
                tracing::debug!(
                    component_type = %definition.component_type,
                    "Replacing component type definition"
                );
                self.definitions[position] = definition;
            }
            None => {
                tracing::debug!(
                    component_type = %definition.component_type,
                    category = %definition.category,
                    "Registering component type"
                );
                self.index
                    .insert(definition.component_type.clone(), self.definitions.len());
                self.definitions.push(definition);
            }
        }

        Ok(())
    }

    /// Remove a definition; later definitions keep their relative order
    pub fn unregister(&mut self, component_type: &str) -> Option<ComponentTypeDefinition> {
        let position = self.index.remove(component_type)?;
        let removed = self.definitions.remove(position);

        for index in self.index.values_mut() {
            if *index > position {
                *index -= 1;
            }
        }

        tracing::debug!(component_type, "Unregistered component type");
        Some(removed)
    }

    pub fn get(&self, component_type: &str) -> Option<&ComponentTypeDefinition> {
        self.index
            .get(component_type)
            .map(|&position| &self.definitions[position])
    }

    pub fn contains(&self, component_type: &str) -> bool {
        self.index.contains_key(component_type)
    }

    /// All definitions in registration order
    pub fn list_all(&self) -> &[ComponentTypeDefinition] {
        &self.definitions
    }

    /// Definitions grouped by category, categories in first-seen order.
    /// The root category is left out.
    pub fn list_by_category(&self) -> Vec<(&str, Vec<&ComponentTypeDefinition>)> {
        let mut groups: Vec<(&str, Vec<&ComponentTypeDefinition>)> = Vec::new();

        for definition in &self.definitions {
            if definition.category == ROOT_CATEGORY {
                continue;
            }

            match groups
                .iter_mut()
                .find(|(category, _)| *category == definition.category)
            {
                Some((_, members)) => members.push(definition),
                None => groups.push((definition.category.as_str(), vec![definition])),
            }
        }

        groups
    }

    /// Unknown types never take children
    pub fn allows_children(&self, component_type: &str) -> bool {
        self.get(component_type)
            .map(|definition| definition.allows_children)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
