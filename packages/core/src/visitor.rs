use crate::node::ComponentNode;

/// Visitor pattern for traversing a component tree immutably
///
/// The default implementation walks the entire subtree pre-order.
/// Override `visit_node` to act on each node, calling [`walk_node`]
/// to continue into children.
pub trait NodeVisitor: Sized {
    fn visit_node(&mut self, node: &ComponentNode) {
        walk_node(self, node);
    }
}

/// Mutable visitor for transforming nodes in place
pub trait NodeVisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut ComponentNode) {
        walk_node_mut(self, node);
    }
}

pub fn walk_node<V: NodeVisitor>(visitor: &mut V, node: &ComponentNode) {
    for child in &node.children {
        visitor.visit_node(child);
    }
}

pub fn walk_node_mut<V: NodeVisitorMut>(visitor: &mut V, node: &mut ComponentNode) {
    for child in &mut node.children {
        visitor.visit_node_mut(child);
    }
}

/// Assigns a fresh id to every node it visits
pub(crate) struct Reidentify<F: FnMut() -> String> {
    pub next_id: F,
}

impl<F: FnMut() -> String> NodeVisitorMut for Reidentify<F> {
    fn visit_node_mut(&mut self, node: &mut ComponentNode) {
        node.id = (self.next_id)();
        walk_node_mut(self, node);
    }
}

/// Collects the distinct component types used in a tree
#[derive(Debug, Default)]
pub struct TypeCollector {
    pub types: Vec<String>,
}

impl NodeVisitor for TypeCollector {
    fn visit_node(&mut self, node: &ComponentNode) {
        if !self.types.contains(&node.component_type) {
            self.types.push(node.component_type.clone());
        }
        walk_node(self, node);
    }
}
