//! # Component Tree
//!
//! A page is a tree of [`ComponentNode`]s. Each node owns its children;
//! child order is the render and display order.
//!
//! The serialized form (`id`, `type`, `label`, `props`, `children`) is the
//! storage format and must round-trip unchanged.

use crate::id_generator::generate_component_id;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deepest tree accepted by editor mutations and the page loader, counting
/// the root as level 1
pub const MAX_TREE_DEPTH: usize = 256;

/// Property name → JSON-compatible value (strings, numbers, booleans, nested objects)
pub type Properties = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub id: String,

    #[serde(rename = "type")]
    pub component_type: String,

    /// Copy of the type's label at creation time
    #[serde(default)]
    pub label: String,

    #[serde(default, alias = "properties")]
    pub props: Properties,

    #[serde(default)]
    pub children: Vec<ComponentNode>,
}

impl ComponentNode {
    /// Build a node directly, bypassing the registry
    pub fn new(
        id: impl Into<String>,
        component_type: impl Into<String>,
        label: impl Into<String>,
        props: Properties,
    ) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            label: label.into(),
            props,
            children: Vec::new(),
        }
    }

    /// Depth-first, pre-order, first match
    pub fn find(&self, id: &str) -> Option<&ComponentNode> {
        if self.id == id {
            return Some(self);
        }

        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ComponentNode> {
        if self.id == id {
            return Some(self);
        }

        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Parent of the node with `id`; `None` for the tree root or a missing id
    pub fn find_parent(&self, id: &str) -> Option<&ComponentNode> {
        if self.children.iter().any(|child| child.id == id) {
            return Some(self);
        }

        self.children.iter().find_map(|child| child.find_parent(id))
    }

    pub fn find_parent_mut(&mut self, id: &str) -> Option<&mut ComponentNode> {
        if self.children.iter().any(|child| child.id == id) {
            return Some(self);
        }

        self.children
            .iter_mut()
            .find_map(|child| child.find_parent_mut(id))
    }

    /// Position of a direct child
    pub fn child_index(&self, id: &str) -> Option<usize> {
        self.children.iter().position(|child| child.id == id)
    }

    /// Number of nodes in this subtree, including self
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(ComponentNode::count_nodes).sum::<usize>()
    }

    /// Levels in this subtree; a leaf is 1
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(ComponentNode::height).max().unwrap_or(0)
    }

    /// Level of the node with `id` below this one (self is 1)
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        if self.id == id {
            return Some(1);
        }

        self.children
            .iter()
            .find_map(|child| child.depth_of(id))
            .map(|depth| depth + 1)
    }

    /// Every id in this subtree, pre-order
    pub fn collect_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.count_nodes());
        self.walk(&mut |node| ids.push(node.id.clone()));
        ids
    }

    /// Visit every node in this subtree, pre-order
    pub fn walk<F: FnMut(&ComponentNode)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Label for display: the stored label, else the type capitalised
    pub fn display_label(&self) -> String {
        if !self.label.is_empty() {
            return self.label.clone();
        }

        let mut chars = self.component_type.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// String view of a top-level property, empty when absent or not a scalar
    pub fn prop_str(&self, key: &str) -> String {
        match self.props.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }
}

/// Create a node of a registered type.
///
/// Default props are merged one level deep: an override at `style` replaces
/// the whole default `style` object. Returns `None` for an unknown type.
pub fn create_node(
    registry: &Registry,
    component_type: &str,
    overrides: Properties,
) -> Option<ComponentNode> {
    let Some(definition) = registry.get(component_type) else {
        tracing::debug!(component_type, "Cannot create node of unknown type");
        return None;
    };

    let mut props = definition.default_props.clone();
    for (key, value) in overrides {
        props.insert(key, value);
    }

    Some(ComponentNode {
        id: generate_component_id(),
        component_type: component_type.to_string(),
        label: definition.label.clone(),
        props,
        children: Vec::new(),
    })
}

/// Depth-first, pre-order search from `tree`
pub fn find_node<'a>(tree: &'a ComponentNode, id: &str) -> Option<&'a ComponentNode> {
    tree.find(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentTypeDefinition;
    use serde_json::json;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(
                ComponentTypeDefinition::new("text", "Text", "Basic")
                    .default_prop("content", "Hello")
                    .default_prop("tag", "p")
                    .default_prop("style", json!({ "color": "#333333", "fontSize": "16px" })),
            )
            .unwrap();
        registry
    }

    fn leaf(id: &str) -> ComponentNode {
        ComponentNode::new(id, "text", "Text", Properties::new())
    }

    #[test]
    fn test_create_node_merges_defaults_shallowly() {
        let registry = registry();
        let mut overrides = Properties::new();
        overrides.insert("content".to_string(), json!("Hi"));
        overrides.insert("style".to_string(), json!({ "color": "#ff0000" }));

        let node = create_node(&registry, "text", overrides).unwrap();

        assert_eq!(node.component_type, "text");
        assert_eq!(node.label, "Text");
        assert_eq!(node.props["content"], json!("Hi"));
        assert_eq!(node.props["tag"], json!("p"));
        // Nested objects are replaced wholesale
        assert_eq!(node.props["style"], json!({ "color": "#ff0000" }));
        assert_eq!(node.props.len(), 3);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_create_node_unknown_type() {
        assert!(create_node(&registry(), "video", Properties::new()).is_none());
    }

    #[test]
    fn test_create_node_ids_differ() {
        let registry = registry();
        let a = create_node(&registry, "text", Properties::new()).unwrap();
        let b = create_node(&registry, "text", Properties::new()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_find_is_preorder_first_match() {
        let mut root = leaf("root");
        let mut a = leaf("a");
        a.children.push(leaf("dup"));
        let mut b = leaf("b");
        b.children.push(leaf("dup"));
        b.children[0].label = "second".to_string();
        root.children.push(a);
        root.children.push(b);

        let found = find_node(&root, "dup").unwrap();
        assert_eq!(found.label, "Text");
        assert!(find_node(&root, "zzz").is_none());
        assert_eq!(root.find_parent("dup").unwrap().id, "a");
        assert!(root.find_parent("root").is_none());
    }

    #[test]
    fn test_collect_ids_and_count() {
        let mut root = leaf("root");
        let mut a = leaf("a");
        a.children.push(leaf("a1"));
        root.children.push(a);
        root.children.push(leaf("b"));

        assert_eq!(root.count_nodes(), 4);
        assert_eq!(root.collect_ids(), vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_display_label_falls_back_to_type() {
        let mut node = leaf("x");
        node.label.clear();
        assert_eq!(node.display_label(), "Text");
    }

    #[test]
    fn test_serialized_shape() {
        let mut node = leaf("n1");
        node.props.insert("content".to_string(), json!("Hi"));

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "n1",
                "type": "text",
                "label": "Text",
                "props": { "content": "Hi" },
                "children": []
            })
        );

        let back: ComponentNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_height_and_depth_of() {
        let mut root = leaf("root");
        let mut middle = leaf("middle");
        middle.children.push(leaf("deep"));
        root.children.push(leaf("shallow"));
        root.children.push(middle);

        assert_eq!(root.height(), 3);
        assert_eq!(leaf("x").height(), 1);
        assert_eq!(root.depth_of("root"), Some(1));
        assert_eq!(root.depth_of("shallow"), Some(2));
        assert_eq!(root.depth_of("deep"), Some(3));
        assert_eq!(root.depth_of("missing"), None);
    }
}
