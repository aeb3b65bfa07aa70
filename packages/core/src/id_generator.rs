use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Prefix marking a page that has never been saved
pub const TEMP_PAGE_PREFIX: &str = "page_";

const COMPONENT_PREFIX: &str = "comp";

// Process-wide sequence; the random suffix only separates processes.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let count = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let random = Uuid::new_v4().simple().to_string();

    format!("{}_{}_{:x}{}", prefix, millis, count, &random[..9])
}

/// Generate a node id: creation timestamp, process sequence and random suffix
pub fn generate_component_id() -> String {
    next_id(COMPONENT_PREFIX)
}

/// Generate a temporary page id, replaced by storage on first save
pub fn generate_page_id() -> String {
    next_id(TEMP_PAGE_PREFIX.trim_end_matches('_'))
}
