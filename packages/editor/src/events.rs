//! # Editor Events
//!
//! Typed change notifications delivered synchronously to subscribers, in
//! subscription order, right after the change they describe.

use pagecraft_core::{ComponentNode, Page};

#[derive(Debug, Clone, Copy)]
pub enum EditorEvent<'a> {
    /// A new node was inserted under `parent_id`
    NodeCreated {
        node: &'a ComponentNode,
        parent_id: &'a str,
    },

    /// `parent`'s children sequence changed
    TreeChanged { parent: &'a ComponentNode },

    /// `node`'s properties were committed
    PropertiesChanged { node: &'a ComponentNode },

    /// Any change that leaves the page with unsaved edits
    PageChanged { page: &'a Page },

    /// The page was persisted and has no unsaved edits
    PageSaved { page: &'a Page },
}

impl EditorEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            EditorEvent::NodeCreated { .. } => "nodeCreated",
            EditorEvent::TreeChanged { .. } => "treeChanged",
            EditorEvent::PropertiesChanged { .. } => "propertiesChanged",
            EditorEvent::PageChanged { .. } => "pageChanged",
            EditorEvent::PageSaved { .. } => "pageSaved",
        }
    }
}

/// Receives editor events
pub trait EventListener: Send {
    fn on_event(&mut self, event: &EditorEvent<'_>);
}

impl<F> EventListener for F
where
    F: FnMut(&EditorEvent<'_>) + Send,
{
    fn on_event(&mut self, event: &EditorEvent<'_>) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Box<dyn EventListener>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl EventListener + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: EditorEvent<'_>) {
        tracing::trace!(event = event.name(), listeners = self.listeners.len(), "Emitting event");
        for (_, listener) in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::Properties;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        let sink = seen.clone();
        let id = bus.subscribe(move |event: &EditorEvent<'_>| {
            sink.lock().unwrap().push(event.name());
        });

        let node = ComponentNode::new("n1", "text", "Text", Properties::new());
        bus.emit(EditorEvent::PropertiesChanged { node: &node });
        bus.emit(EditorEvent::TreeChanged { parent: &node });

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(EditorEvent::TreeChanged { parent: &node });

        assert_eq!(*seen.lock().unwrap(), vec!["propertiesChanged", "treeChanged"]);
        assert!(bus.is_empty());
    }
}
