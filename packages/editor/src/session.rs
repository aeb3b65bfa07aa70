//! # Edit Session
//!
//! One user's editing state for one page: the page itself, the selected
//! node, in-progress field edits and whether anything is unsaved.
//!
//! Every change goes through the session so that subscribers see a
//! [`EditorEvent`] for it and the unsaved-changes flag stays accurate.
//! Persistence is not done here. Callers take [`EditSession::page`] (or a
//! clone of it) to storage and report back with [`EditSession::mark_saved`].

use crate::events::{EditorEvent, EventBus, EventListener, SubscriptionId};
use crate::mutations::{Mutation, MutationOutcome};
use crate::EditorError;
use pagecraft_compiler_html::{RenderEngine, RenderOptions};
use pagecraft_core::{
    editable_fields_for, group_fields, ComponentNode, FieldDraft, FieldGroup, Page,
    PropertyFieldDefinition, Registry, ValidationResult,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

type DraftKey = (String, String);

pub struct EditSession {
    engine: Arc<RenderEngine>,
    page: Page,
    selected: Option<String>,
    drafts: HashMap<DraftKey, FieldDraft>,
    dirty: bool,
    version: u64,
    events: EventBus,
}

impl EditSession {
    pub fn new(engine: Arc<RenderEngine>, page: Page) -> Self {
        Self {
            engine,
            page,
            selected: None,
            drafts: HashMap::new(),
            dirty: false,
            version: 0,
            events: EventBus::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    pub fn registry(&self) -> &Registry {
        self.engine.registry()
    }

    /// Bumped on every change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn subscribe(&mut self, listener: impl EventListener + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Apply a tree mutation and notify subscribers if anything changed
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationOutcome, EditorError> {
        let outcome = mutation.apply(&mut self.page.root_component, self.engine.registry())?;

        if outcome.is_change() {
            let inserted = matches!(
                mutation,
                Mutation::AddChild { .. } | Mutation::InsertNew { .. }
            );
            self.record_change(&outcome, inserted);
        }

        Ok(outcome)
    }

    /// Create a node of `component_type` under `parent_id`.
    /// Returns the new node's id, or `None` when nothing was inserted.
    pub fn insert(
        &mut self,
        parent_id: &str,
        component_type: &str,
    ) -> Result<Option<String>, EditorError> {
        let outcome = self.apply(Mutation::InsertNew {
            parent_id: parent_id.to_string(),
            component_type: component_type.to_string(),
            overrides: Default::default(),
        })?;

        Ok(match outcome {
            MutationOutcome::TreeChanged { node_id, .. } => node_id,
            _ => None,
        })
    }

    fn record_change(&mut self, outcome: &MutationOutcome, inserted: bool) {
        self.version += 1;
        self.dirty = true;
        self.page.touch();
        self.forget_missing_nodes();

        let root = &self.page.root_component;
        match outcome {
            MutationOutcome::TreeChanged { parent_id, node_id } => {
                if inserted {
                    if let Some(node) = node_id.as_deref().and_then(|id| root.find(id)) {
                        self.events.emit(EditorEvent::NodeCreated { node, parent_id });
                    }
                }
                if let Some(parent) = root.find(parent_id) {
                    self.events.emit(EditorEvent::TreeChanged { parent });
                }
            }
            MutationOutcome::PropertiesChanged { node_id } => {
                if let Some(node) = root.find(node_id) {
                    self.events.emit(EditorEvent::PropertiesChanged { node });
                }
            }
            MutationOutcome::Unchanged => {}
        }

        self.events.emit(EditorEvent::PageChanged { page: &self.page });
    }

    /// Drop selection and drafts that point at deleted nodes
    fn forget_missing_nodes(&mut self) {
        let root = &self.page.root_component;

        if let Some(id) = &self.selected {
            if root.find(id).is_none() {
                self.selected = None;
            }
        }
        self.drafts.retain(|(node_id, _), _| root.find(node_id).is_some());
    }

    fn page_changed(&mut self) {
        self.version += 1;
        self.dirty = true;
        self.events.emit(EditorEvent::PageChanged { page: &self.page });
    }

    /// Select a node for editing. The root can't be selected.
    pub fn select(&mut self, node_id: &str) -> Option<&ComponentNode> {
        let root = &self.page.root_component;
        if root.id == node_id || root.find(node_id).is_none() {
            return None;
        }

        self.selected = Some(node_id.to_string());
        root.find(node_id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&ComponentNode> {
        self.selected
            .as_deref()
            .and_then(|id| self.page.root_component.find(id))
    }

    pub fn editable_fields(&self, node_id: &str) -> Option<&[PropertyFieldDefinition]> {
        let node = self.page.root_component.find(node_id)?;
        editable_fields_for(self.engine.registry(), node)
    }

    pub fn field_groups(&self, node_id: &str) -> Vec<FieldGroup> {
        self.editable_fields(node_id)
            .map(group_fields)
            .unwrap_or_default()
    }

    fn field(&self, node_id: &str, path: &str) -> Result<PropertyFieldDefinition, EditorError> {
        if self.page.root_component.find(node_id).is_none() {
            return Err(EditorError::NodeNotFound(node_id.to_string()));
        }

        self.editable_fields(node_id)
            .and_then(|fields| fields.iter().find(|field| field.path == path))
            .cloned()
            .ok_or_else(|| EditorError::UnknownField {
                node_id: node_id.to_string(),
                path: path.to_string(),
            })
    }

    /// Start (or continue) editing a field from the node's current value
    pub fn begin_edit(&mut self, node_id: &str, path: &str) -> Result<&FieldDraft, EditorError> {
        let key = (node_id.to_string(), path.to_string());

        if !self.drafts.contains_key(&key) {
            let field = self.field(node_id, path)?;
            let node = self
                .page
                .root_component
                .find(node_id)
                .ok_or_else(|| EditorError::NodeNotFound(node_id.to_string()))?;
            let draft = FieldDraft::begin(field, &node.props);
            self.drafts.insert(key.clone(), draft);
        }

        self.drafts
            .get(&key)
            .ok_or_else(|| EditorError::NoDraft {
                node_id: node_id.to_string(),
                path: path.to_string(),
            })
    }

    /// Record an intermediate value and validate it.
    /// Nothing is written to the node until [`commit_edit`](Self::commit_edit).
    pub fn edit_field(
        &mut self,
        node_id: &str,
        path: &str,
        value: Value,
    ) -> Result<ValidationResult, EditorError> {
        self.begin_edit(node_id, path)?;

        let key = (node_id.to_string(), path.to_string());
        let draft = self.drafts.get_mut(&key).ok_or_else(|| EditorError::NoDraft {
            node_id: node_id.to_string(),
            path: path.to_string(),
        })?;

        Ok(draft.input(value).clone())
    }

    pub fn draft(&self, node_id: &str, path: &str) -> Option<&FieldDraft> {
        self.drafts.get(&(node_id.to_string(), path.to_string()))
    }

    pub fn discard_edit(&mut self, node_id: &str, path: &str) -> bool {
        self.drafts
            .remove(&(node_id.to_string(), path.to_string()))
            .is_some()
    }

    /// Write a valid draft into the node. An invalid draft stays pending
    /// and the node is left as it was.
    pub fn commit_edit(&mut self, node_id: &str, path: &str) -> Result<MutationOutcome, EditorError> {
        let key = (node_id.to_string(), path.to_string());
        let mut draft = self.drafts.remove(&key).ok_or_else(|| EditorError::NoDraft {
            node_id: node_id.to_string(),
            path: path.to_string(),
        })?;

        let Some(node) = self.page.root_component.find_mut(node_id) else {
            return Err(EditorError::NodeNotFound(node_id.to_string()));
        };

        let props = match draft.commit(&node.props) {
            Ok(props) => props,
            Err(result) => {
                self.drafts.insert(key, draft);
                return Err(EditorError::Validation {
                    path: path.to_string(),
                    message: result.message,
                });
            }
        };

        if props == node.props {
            return Ok(MutationOutcome::Unchanged);
        }

        node.props = props;
        let outcome = MutationOutcome::PropertiesChanged {
            node_id: node_id.to_string(),
        };
        self.record_change(&outcome, false);
        Ok(outcome)
    }

    pub fn set_title(&mut self, title: &str) {
        self.page.set_title(title);
        self.page_changed();
    }

    pub fn set_description(&mut self, description: &str) {
        self.page.metadata.description = description.to_string();
        self.page.touch();
        self.page_changed();
    }

    pub fn set_keywords(&mut self, keywords: &str) {
        self.page.metadata.keywords = keywords.to_string();
        self.page.touch();
        self.page_changed();
    }

    pub fn publish(&mut self) {
        self.page.publish();
        self.page_changed();
    }

    pub fn archive(&mut self) {
        self.page.archive();
        self.page_changed();
    }

    /// Record a successful save of the page as it was at `saved_version`.
    ///
    /// `saved_id` replaces a temporary id. Edits made after the saved
    /// version keep the session marked as unsaved.
    pub fn mark_saved(&mut self, saved_id: &str, saved_version: u64) {
        if self.page.id != saved_id {
            tracing::debug!(from = %self.page.id, to = %saved_id, "Page id assigned by storage");
            self.page.id = saved_id.to_string();
        }

        if saved_version == self.version {
            self.dirty = false;
        }
        self.events.emit(EditorEvent::PageSaved { page: &self.page });
    }

    /// Document with editor metadata for the live preview
    pub fn preview_html(&self) -> Result<String, EditorError> {
        self.render(&RenderOptions::editor_preview())
    }

    pub fn render(&self, options: &RenderOptions) -> Result<String, EditorError> {
        Ok(self.engine.render_page(&self.page, options)?)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.page)?)
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("page_id", &self.page.id)
            .field("selected", &self.selected)
            .field("dirty", &self.dirty)
            .field("version", &self.version)
            .field("events", &self.events)
            .finish()
    }
}
