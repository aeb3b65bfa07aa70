//! # Tree Mutations
//!
//! Structural edits applied to a parent's children sequence.
//!
//! ## Semantics
//!
//! - Each operation returns whether the tree changed. A missing target,
//!   a boundary move or a rejected insert is a silent no-op, not an error.
//! - The tree root is never anyone's child, so it can't be deleted,
//!   duplicated or reordered.
//! - Duplicates get fresh ids across the whole cloned subtree.
//!
//! [`TreeEditor`] wraps the same operations and notifies a
//! [`ChangeObserver`] with the mutated parent after every change.

use crate::id_generator::generate_component_id;
use crate::node::ComponentNode;
use crate::registry::Registry;
use crate::visitor::{NodeVisitorMut, Reidentify};

/// Remove the first child with `target_id`
pub fn delete_child(parent: &mut ComponentNode, target_id: &str) -> bool {
    match parent.child_index(target_id) {
        Some(index) => {
            parent.children.remove(index);
            true
        }
        None => false,
    }
}

/// Deep-clone the child with `target_id`, re-id the whole clone and insert it
/// right after the original. Returns the clone's id.
pub fn duplicate_child(parent: &mut ComponentNode, target_id: &str) -> Option<String> {
    let index = parent.child_index(target_id)?;

    let mut clone = parent.children[index].clone();
    Reidentify {
        next_id: generate_component_id,
    }
    .visit_node_mut(&mut clone);

    let clone_id = clone.id.clone();
    parent.children.insert(index + 1, clone);
    Some(clone_id)
}

/// Swap the target with its predecessor
pub fn move_up(parent: &mut ComponentNode, target_id: &str) -> bool {
    match parent.child_index(target_id) {
        Some(index) if index > 0 => {
            parent.children.swap(index - 1, index);
            true
        }
        _ => false,
    }
}

/// Swap the target with its successor
pub fn move_down(parent: &mut ComponentNode, target_id: &str) -> bool {
    match parent.child_index(target_id) {
        Some(index) if index + 1 < parent.children.len() => {
            parent.children.swap(index, index + 1);
            true
        }
        _ => false,
    }
}

/// Append `node` to `parent`'s children.
///
/// Rejected when the parent's type is unknown, doesn't allow children or
/// has reached `maxChildren`.
pub fn add_child(registry: &Registry, parent: &mut ComponentNode, node: ComponentNode) -> bool {
    let accepts = registry
        .get(&parent.component_type)
        .map(|definition| definition.accepts_child(parent.children.len()))
        .unwrap_or(false);

    if !accepts {
        tracing::debug!(
            parent_id = %parent.id,
            parent_type = %parent.component_type,
            child_type = %node.component_type,
            "Parent does not accept children"
        );
        return false;
    }

    parent.children.push(node);
    true
}

/// Receives the mutated parent after each structural change
pub trait ChangeObserver {
    fn tree_changed(&mut self, parent: &ComponentNode);
}

impl<F: FnMut(&ComponentNode)> ChangeObserver for F {
    fn tree_changed(&mut self, parent: &ComponentNode) {
        self(parent)
    }
}

/// Structural operations that report every change to an observer
pub struct TreeEditor<'a, O: ChangeObserver> {
    registry: &'a Registry,
    observer: O,
}

impl<'a, O: ChangeObserver> TreeEditor<'a, O> {
    pub fn new(registry: &'a Registry, observer: O) -> Self {
        Self { registry, observer }
    }

    fn notify(&mut self, changed: bool, parent: &ComponentNode) -> bool {
        if changed {
            self.observer.tree_changed(parent);
        }
        changed
    }

    pub fn add_child(&mut self, parent: &mut ComponentNode, node: ComponentNode) -> bool {
        let changed = add_child(self.registry, parent, node);
        self.notify(changed, parent)
    }

    pub fn delete_child(&mut self, parent: &mut ComponentNode, target_id: &str) -> bool {
        let changed = delete_child(parent, target_id);
        self.notify(changed, parent)
    }

    pub fn duplicate_child(&mut self, parent: &mut ComponentNode, target_id: &str) -> Option<String> {
        let clone_id = duplicate_child(parent, target_id);
        self.notify(clone_id.is_some(), parent);
        clone_id
    }

    pub fn move_up(&mut self, parent: &mut ComponentNode, target_id: &str) -> bool {
        let changed = move_up(parent, target_id);
        self.notify(changed, parent)
    }

    pub fn move_down(&mut self, parent: &mut ComponentNode, target_id: &str) -> bool {
        let changed = move_down(parent, target_id);
        self.notify(changed, parent)
    }

    pub fn into_observer(self) -> O {
        self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Properties;
    use crate::registry::ComponentTypeDefinition;
    use std::collections::HashSet;

    fn node(id: &str, ty: &str) -> ComponentNode {
        ComponentNode::new(id, ty, "", Properties::new())
    }

    fn parent_with(ids: &[&str]) -> ComponentNode {
        let mut parent = node("parent", "container");
        for id in ids {
            parent.children.push(node(id, "text"));
        }
        parent
    }

    fn child_ids(parent: &ComponentNode) -> Vec<&str> {
        parent.children.iter().map(|c| c.id.as_str()).collect()
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(ComponentTypeDefinition::new("container", "Container", "Layout").allows_children(true))
            .unwrap();
        registry
            .register(ComponentTypeDefinition::new("text", "Text", "Basic"))
            .unwrap();
        registry
    }

    #[test]
    fn test_delete_child() {
        let mut parent = parent_with(&["a", "b", "c"]);
        assert!(delete_child(&mut parent, "b"));
        assert_eq!(child_ids(&parent), vec!["a", "c"]);

        assert!(!delete_child(&mut parent, "zzz"));
        assert!(!delete_child(&mut node("leaf", "text"), "a"));
    }

    #[test]
    fn test_move_up_and_down() {
        let mut parent = parent_with(&["a", "b", "c"]);

        assert!(!move_up(&mut parent, "a"));
        assert_eq!(child_ids(&parent), vec!["a", "b", "c"]);

        assert!(move_up(&mut parent, "b"));
        assert_eq!(child_ids(&parent), vec!["b", "a", "c"]);

        assert!(!move_down(&mut parent, "c"));
        assert!(move_down(&mut parent, "b"));
        assert_eq!(child_ids(&parent), vec!["a", "b", "c"]);

        assert!(!move_down(&mut parent, "missing"));
    }

    #[test]
    fn test_duplicate_reids_whole_subtree() {
        let mut inner = node("inner", "container");
        inner.children.push(node("leaf-1", "text"));
        inner.children.push(node("leaf-2", "text"));
        let mut parent = parent_with(&["a"]);
        parent.children.push(inner);
        parent.children.push(node("z", "text"));

        let clone_id = duplicate_child(&mut parent, "inner").unwrap();

        assert_eq!(parent.children.len(), 4);
        assert_eq!(parent.children[1].id, "inner");
        assert_eq!(parent.children[2].id, clone_id);
        assert_eq!(parent.children[3].id, "z");

        let original = parent.children[1].collect_ids();
        let cloned = parent.children[2].collect_ids();
        assert_eq!(cloned.len(), 3);
        for id in &cloned {
            assert!(!original.contains(id));
        }
        let distinct: HashSet<_> = cloned.iter().collect();
        assert_eq!(distinct.len(), cloned.len());

        assert!(duplicate_child(&mut parent, "missing").is_none());
    }

    #[test]
    fn test_add_child_respects_nesting_rules() {
        let registry = registry();

        let mut container = node("c", "container");
        assert!(add_child(&registry, &mut container, node("t", "text")));
        assert_eq!(container.children.len(), 1);

        let mut text = node("t2", "text");
        assert!(!add_child(&registry, &mut text, node("t3", "text")));
        assert!(text.children.is_empty());

        let mut unknown = node("u", "video");
        assert!(!add_child(&registry, &mut unknown, node("t4", "text")));
    }

    #[test]
    fn test_tree_editor_notifies_only_on_change() {
        let registry = registry();
        let mut parent = parent_with(&["a", "b"]);
        let mut notified = Vec::new();

        {
            let mut editor = TreeEditor::new(&registry, |p: &ComponentNode| {
                notified.push(p.children.len())
            });
            editor.move_up(&mut parent, "a");
            editor.move_up(&mut parent, "b");
            editor.delete_child(&mut parent, "missing");
            editor.add_child(&mut parent, node("c", "text"));
        }

        assert_eq!(notified, vec![2, 3]);
    }
}
