use pagecraft_compiler_html::RenderOptions;
use pagecraft_workspace::WorkspaceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Page, asset and upload settings
    #[serde(flatten)]
    pub workspace: WorkspaceConfig,

    /// Directory rendered HTML is written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Default render options, overridable per command
    #[serde(default)]
    pub render: RenderOptions,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn get_out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: WorkspaceConfig::default(),
            out_dir: default_out_dir(),
            render: RenderOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "pagesDir": "content/pages",
            "outDir": "public",
            "assetBaseUrl": "https://cdn.example.com/assets",
            "render": { "optimizeForProduction": true, "lang": "de" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.workspace.pages_dir, "content/pages");
        assert_eq!(config.workspace.assets_dir, "uploads");
        assert_eq!(config.workspace.asset_base_url, "https://cdn.example.com/assets");
        assert_eq!(config.out_dir, "public");
        assert!(config.render.optimize_for_production);
        assert_eq!(config.render.lang, "de");
        assert!(config.render.add_scripts);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.out_dir, "dist");
        assert_eq!(config.workspace.pages_dir, "pages");
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
