//! # Page Mutations
//!
//! Id-addressed operations on a page's component tree.
//!
//! ## Semantics
//!
//! - Structural mutations resolve the target's parent by pre-order search.
//!   Targeting the root, a missing id or a boundary move is a no-op and
//!   yields [`MutationOutcome::Unchanged`], never an error.
//! - `InsertNew` on an unknown type creates nothing and is also a no-op.
//! - `SetProperty` is validated against the field declared for that path.
//!   Invalid values are rejected and the node keeps its old value.
//! - Inserts may not take the tree past [`MAX_TREE_DEPTH`] levels, and an
//!   added subtree's ids must be unique among themselves and in the tree.
//! - Each mutation is applied in full or not at all.

use pagecraft_core::mutations::add_child;
use pagecraft_core::{
    create_node, editable_fields_for, set_value, validate_field, ComponentNode, Properties,
    PropertyPath, Registry, TreeEditor, MAX_TREE_DEPTH,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Semantic tree edits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mutation {
    /// Append an already-built node
    #[serde(rename_all = "camelCase")]
    AddChild {
        parent_id: String,
        node: ComponentNode,
    },

    /// Create a node from the registry and append it
    #[serde(rename_all = "camelCase")]
    InsertNew {
        parent_id: String,
        component_type: String,
        #[serde(default)]
        overrides: Properties,
    },

    #[serde(rename_all = "camelCase")]
    DeleteNode { node_id: String },

    /// Deep copy placed right after the original
    #[serde(rename_all = "camelCase")]
    DuplicateNode { node_id: String },

    #[serde(rename_all = "camelCase")]
    MoveUp { node_id: String },

    #[serde(rename_all = "camelCase")]
    MoveDown { node_id: String },

    /// Write one (possibly dotted) property path
    #[serde(rename_all = "camelCase")]
    SetProperty {
        node_id: String,
        path: String,
        value: Value,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Node id already in tree: {0}")]
    DuplicateId(String),

    #[error("Tree would be {depth} levels deep, limit is {max}")]
    TooDeep { depth: usize, max: usize },

    #[error("Unsupported property path: {0}")]
    UnsupportedPath(String),

    #[error("Invalid value for '{path}': {message}")]
    InvalidValue { path: String, message: String },

    #[error("Invalid mutation: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy)]
enum Structural {
    Delete,
    Duplicate,
    MoveUp,
    MoveDown,
}

/// What a successfully applied mutation did
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Unchanged,

    /// `parent_id`'s children changed. `node_id` is the inserted or
    /// duplicated node, if one was created.
    TreeChanged {
        parent_id: String,
        node_id: Option<String>,
    },

    PropertiesChanged { node_id: String },
}

impl MutationOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, MutationOutcome::Unchanged)
    }

    fn tree(parent_id: Option<String>, node_id: Option<String>) -> Self {
        match parent_id {
            Some(parent_id) => MutationOutcome::TreeChanged { parent_id, node_id },
            None => MutationOutcome::Unchanged,
        }
    }
}

impl Mutation {
    /// Apply to the tree under `root`
    pub fn apply(
        &self,
        root: &mut ComponentNode,
        registry: &Registry,
    ) -> Result<MutationOutcome, MutationError> {
        self.validate(root)?;

        let outcome = match self {
            Mutation::AddChild { parent_id, node } => {
                Self::apply_add(root, registry, parent_id, node.clone())?
            }

            Mutation::InsertNew {
                parent_id,
                component_type,
                overrides,
            } => match create_node(registry, component_type, overrides.clone()) {
                Some(node) => Self::apply_add(root, registry, parent_id, node)?,
                None => MutationOutcome::Unchanged,
            },

            Mutation::DeleteNode { node_id } => {
                Self::apply_structural(root, registry, node_id, Structural::Delete)
            }

            Mutation::DuplicateNode { node_id } => {
                Self::apply_structural(root, registry, node_id, Structural::Duplicate)
            }

            Mutation::MoveUp { node_id } => {
                Self::apply_structural(root, registry, node_id, Structural::MoveUp)
            }

            Mutation::MoveDown { node_id } => {
                Self::apply_structural(root, registry, node_id, Structural::MoveDown)
            }

            Mutation::SetProperty {
                node_id,
                path,
                value,
            } => Self::apply_set_property(root, registry, node_id, path, value)?,
        };

        if !outcome.is_change() {
            tracing::debug!(mutation = self.name(), "Mutation had no effect");
        }

        Ok(outcome)
    }

    fn apply_add(
        root: &mut ComponentNode,
        registry: &Registry,
        parent_id: &str,
        node: ComponentNode,
    ) -> Result<MutationOutcome, MutationError> {
        let parent = root
            .find_mut(parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;

        let node_id = node.id.clone();
        if add_child(registry, parent, node) {
            Ok(MutationOutcome::TreeChanged {
                parent_id: parent_id.to_string(),
                node_id: Some(node_id),
            })
        } else {
            Ok(MutationOutcome::Unchanged)
        }
    }

    /// Run a parent-level operation through a [`TreeEditor`], recording the
    /// parent it reports as changed
    fn apply_structural(
        root: &mut ComponentNode,
        registry: &Registry,
        node_id: &str,
        op: Structural,
    ) -> MutationOutcome {
        let Some(parent) = root.find_parent_mut(node_id) else {
            return MutationOutcome::Unchanged;
        };

        let mut changed_parent: Option<String> = None;
        let mut editor = TreeEditor::new(registry, |parent: &ComponentNode| {
            changed_parent = Some(parent.id.clone());
        });

        let created = match op {
            Structural::Delete => {
                editor.delete_child(parent, node_id);
                None
            }
            Structural::Duplicate => editor.duplicate_child(parent, node_id),
            Structural::MoveUp => {
                editor.move_up(parent, node_id);
                None
            }
            Structural::MoveDown => {
                editor.move_down(parent, node_id);
                None
            }
        };
        drop(editor);

        MutationOutcome::tree(changed_parent, created)
    }

    fn apply_set_property(
        root: &mut ComponentNode,
        registry: &Registry,
        node_id: &str,
        path: &str,
        value: &Value,
    ) -> Result<MutationOutcome, MutationError> {
        if root.id == node_id {
            return Ok(MutationOutcome::Unchanged);
        }

        let node = root
            .find_mut(node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;

        if let Some(field) = editable_fields_for(registry, node)
            .and_then(|fields| fields.iter().find(|field| field.path == path))
        {
            let result = validate_field(field, value);
            if !result.valid {
                return Err(MutationError::InvalidValue {
                    path: path.to_string(),
                    message: result.message,
                });
            }
        }

        let props = set_value(&node.props, path, value.clone());
        if props == node.props {
            return Ok(MutationOutcome::Unchanged);
        }

        node.props = props;
        Ok(MutationOutcome::PropertiesChanged {
            node_id: node_id.to_string(),
        })
    }

    /// Check the mutation against the tree it will be applied to
    pub fn validate(&self, root: &ComponentNode) -> Result<(), MutationError> {
        match self {
            Mutation::AddChild { parent_id, node } => {
                if parent_id.is_empty() {
                    return Err(MutationError::Invalid("Empty parent ID".to_string()));
                }
                if node.id.is_empty() || node.component_type.is_empty() {
                    return Err(MutationError::Invalid(
                        "Node needs an id and a type".to_string(),
                    ));
                }

                let parent_depth = Self::parent_depth(root, parent_id)?;
                Self::check_depth(parent_depth + node.height())?;

                let mut seen: HashSet<String> = root.collect_ids().into_iter().collect();
                for id in node.collect_ids() {
                    if !seen.insert(id.clone()) {
                        return Err(MutationError::DuplicateId(id));
                    }
                }
            }

            Mutation::InsertNew {
                parent_id,
                component_type,
                ..
            } => {
                if parent_id.is_empty() {
                    return Err(MutationError::Invalid("Empty parent ID".to_string()));
                }
                if component_type.is_empty() {
                    return Err(MutationError::Invalid("Empty component type".to_string()));
                }

                let parent_depth = Self::parent_depth(root, parent_id)?;
                Self::check_depth(parent_depth + 1)?;
            }

            Mutation::DeleteNode { node_id }
            | Mutation::DuplicateNode { node_id }
            | Mutation::MoveUp { node_id }
            | Mutation::MoveDown { node_id } => {
                if node_id.is_empty() {
                    return Err(MutationError::Invalid("Empty node ID".to_string()));
                }
            }

            Mutation::SetProperty { node_id, path, .. } => {
                if node_id.is_empty() {
                    return Err(MutationError::Invalid("Empty node ID".to_string()));
                }
                if path.is_empty() {
                    return Err(MutationError::Invalid("Empty property path".to_string()));
                }
                if PropertyPath::parse(path) == PropertyPath::Unsupported {
                    return Err(MutationError::UnsupportedPath(path.clone()));
                }
            }
        }

        Ok(())
    }

    fn parent_depth(root: &ComponentNode, parent_id: &str) -> Result<usize, MutationError> {
        root.depth_of(parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))
    }

    fn check_depth(depth: usize) -> Result<(), MutationError> {
        if depth > MAX_TREE_DEPTH {
            return Err(MutationError::TooDeep {
                depth,
                max: MAX_TREE_DEPTH,
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddChild { .. } => "addChild",
            Mutation::InsertNew { .. } => "insertNew",
            Mutation::DeleteNode { .. } => "deleteNode",
            Mutation::DuplicateNode { .. } => "duplicateNode",
            Mutation::MoveUp { .. } => "moveUp",
            Mutation::MoveDown { .. } => "moveDown",
            Mutation::SetProperty { .. } => "setProperty",
        }
    }
}
