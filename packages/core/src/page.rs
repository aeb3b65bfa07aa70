use crate::id_generator::{generate_page_id, TEMP_PAGE_PREFIX};
use crate::node::{create_node, ComponentNode, Properties, MAX_TREE_DEPTH};
use crate::registry::{Registry, ROOT_TYPE};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;

/// Deepest `{`/`[` nesting [`Page::from_json`] accepts: two levels per tree
/// level (node object and `children` array) plus room for nested props
pub const MAX_JSON_NESTING: usize = 2 * MAX_TREE_DEPTH + 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub keywords: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl PageMetadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            description: String::new(),
            keywords: String::new(),
            author: None,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }
}

/// A page owns its root node and, through it, the whole tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub status: PageStatus,
    pub root_component: ComponentNode,
    pub metadata: PageMetadata,
}

impl Page {
    /// New draft page with a temporary id
    pub fn new(title: impl Into<String>, root: ComponentNode) -> Self {
        let title = title.into();
        Self {
            id: generate_page_id(),
            slug: slugify(&title),
            title,
            status: PageStatus::Draft,
            root_component: root,
            metadata: PageMetadata::new(Utc::now()),
        }
    }

    /// New draft page with a fresh root node; `None` when the root type isn't registered
    pub fn blank(registry: &Registry, title: impl Into<String>) -> Option<Self> {
        let mut overrides = Properties::new();
        overrides.insert(
            "style".to_string(),
            json!({
                "minHeight": "100vh",
                "padding": "20px",
                "backgroundColor": "#ffffff",
            }),
        );
        let root = create_node(registry, ROOT_TYPE, overrides)?;

        let mut page = Self::new(title, root);
        page.metadata.description = "A page created with Pagecraft".to_string();
        Some(page)
    }

    /// Not yet assigned a durable id by storage
    pub fn is_temporary(&self) -> bool {
        self.id.starts_with(TEMP_PAGE_PREFIX)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.slug = slugify(&self.title);
        self.touch();
    }

    pub fn publish(&mut self) {
        let now = Utc::now();
        self.status = PageStatus::Published;
        self.metadata.published_at = Some(now);
        self.metadata.updated_at = now;
    }

    pub fn archive(&mut self) {
        self.status = PageStatus::Archived;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }

    pub fn find_node(&self, id: &str) -> Option<&ComponentNode> {
        self.root_component.find(id)
    }

    /// Parse a stored page.
    ///
    /// serde_json's default recursion limit of 128 would reject trees deeper
    /// than about 63 nodes. The limit is lifted here and replaced by a
    /// nesting check against [`MAX_JSON_NESTING`], so input can't exhaust
    /// the stack.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let nesting = nesting_depth(json);
        if nesting > MAX_JSON_NESTING {
            return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "page JSON is nested {} levels deep, limit is {}",
                nesting, MAX_JSON_NESTING
            )));
        }

        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let page = Page::deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(page)
    }
}

/// Deepest object/array nesting in `json`, ignoring brackets inside strings
fn nesting_depth(json: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

/// Lowercase, collapse runs of non-alphanumerics into one hyphen, trim hyphens
pub fn slugify(title: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators = SEPARATORS.get_or_init(|| Regex::new("[^a-z0-9]+").expect("valid regex"));

    let lowered = title.to_lowercase();
    separators
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
