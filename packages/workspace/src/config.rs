use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Where pages and uploads live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
    /// Directory holding one JSON file per page
    pub pages_dir: String,

    /// Directory uploaded assets are written to
    pub assets_dir: String,

    /// Public URL prefix under which `assets_dir` is served
    pub asset_base_url: String,

    pub max_upload_bytes: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            pages_dir: "pages".to_string(),
            assets_dir: "uploads".to_string(),
            asset_base_url: "http://localhost:3000/uploads".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl WorkspaceConfig {
    pub fn pages_path(&self, root: &Path) -> PathBuf {
        root.join(&self.pages_dir)
    }

    pub fn assets_path(&self, root: &Path) -> PathBuf {
        root.join(&self.assets_dir)
    }
}
