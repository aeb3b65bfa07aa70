//! # Plugins
//!
//! A [`Plugin`] extends the builder with component types and their
//! renderers. [`PluginManager`] owns the [`RenderEngine`] the plugins
//! extend and keeps the plugins that initialized successfully.
//!
//! Registering a plugin whose id is already taken destroys the old one
//! first. A plugin whose `initialize` fails is not kept.

use crate::compiler::RenderEngine;
use pagecraft_core::RegistryError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PluginError {
    #[error("Plugin id must not be empty")]
    EmptyId,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Plugin '{plugin_id}' failed to initialize: {message}")]
    Failed { plugin_id: String, message: String },
}

/// Builder extension
pub trait Plugin: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Register component types and renderers on `engine`
    fn initialize(&mut self, engine: &mut RenderEngine) -> Result<(), PluginError>;

    /// Undo what `initialize` registered
    fn destroy(&mut self, _engine: &mut RenderEngine) {}
}

pub struct PluginManager {
    engine: RenderEngine,
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    pub fn new(engine: RenderEngine) -> Self {
        Self {
            engine,
            plugins: Vec::new(),
        }
    }

    /// Initialize and keep `plugin`, replacing any plugin with the same id
    pub fn register(&mut self, mut plugin: Box<dyn Plugin>) -> Result<(), PluginError> {
        if plugin.id().is_empty() {
            return Err(PluginError::EmptyId);
        }

        if self.unregister(plugin.id()) {
            tracing::warn!(plugin_id = plugin.id(), "Plugin already registered; replaced");
        }

        if let Err(e) = plugin.initialize(&mut self.engine) {
            tracing::error!(plugin_id = plugin.id(), error = %e, "Plugin failed to initialize");
            return Err(e);
        }

        tracing::info!(
            plugin_id = plugin.id(),
            name = plugin.name(),
            version = plugin.version(),
            "Registered plugin"
        );
        self.plugins.push(plugin);
        Ok(())
    }

    /// Destroy and drop the plugin with `id`; false if there is none
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(position) = self.plugins.iter().position(|plugin| plugin.id() == id) else {
            tracing::debug!(plugin_id = id, "No plugin to unregister");
            return false;
        };

        let mut plugin = self.plugins.remove(position);
        plugin.destroy(&mut self.engine);
        tracing::info!(plugin_id = id, "Unregistered plugin");
        true
    }

    pub fn get(&self, id: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|plugin| plugin.id() == id)
            .map(|plugin| plugin.as_ref())
    }

    /// Plugins in registration order
    pub fn list(&self) -> Vec<&dyn Plugin> {
        self.plugins.iter().map(|plugin| plugin.as_ref()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    /// Hand the extended engine to its users. Plugins are dropped without
    /// being destroyed, so what they registered stays.
    pub fn into_engine(self) -> RenderEngine {
        self.engine
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("plugins", &self.plugins.iter().map(|p| p.id()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{ComponentRenderer, RenderContext, RenderError, RenderOptions};
    use pagecraft_core::builtin::register_builtin_components;
    use pagecraft_core::{create_node, ComponentNode, ComponentTypeDefinition, Properties, Registry};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ButtonRenderer;

    impl ComponentRenderer for ButtonRenderer {
        fn render(&self, node: &ComponentNode, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
            ctx.text_element(node, "button", &[], &node.prop_str("text"));
            Ok(())
        }
    }

    struct ButtonPlugin {
        version: &'static str,
        label: &'static str,
        destroyed: Arc<AtomicUsize>,
    }

    impl ButtonPlugin {
        fn boxed(version: &'static str, label: &'static str, destroyed: &Arc<AtomicUsize>) -> Box<dyn Plugin> {
            Box::new(Self {
                version,
                label,
                destroyed: destroyed.clone(),
            })
        }
    }

    impl Plugin for ButtonPlugin {
        fn id(&self) -> &str {
            "buttons"
        }

        fn name(&self) -> &str {
            "Buttons"
        }

        fn version(&self) -> &str {
            self.version
        }

        fn initialize(&mut self, engine: &mut RenderEngine) -> Result<(), PluginError> {
            engine.registry_mut().register(
                ComponentTypeDefinition::new("button", "Button", "Forms").default_prop("text", self.label),
            )?;
            engine.register_renderer("button", ButtonRenderer);
            Ok(())
        }

        fn destroy(&mut self, engine: &mut RenderEngine) {
            engine.registry_mut().unregister("button");
            engine.unregister_renderer("button");
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct BrokenPlugin;

    impl Plugin for BrokenPlugin {
        fn id(&self) -> &str {
            "broken"
        }

        fn name(&self) -> &str {
            "Broken"
        }

        fn version(&self) -> &str {
            "0.0.1"
        }

        fn initialize(&mut self, _engine: &mut RenderEngine) -> Result<(), PluginError> {
            Err(PluginError::Failed {
                plugin_id: "broken".to_string(),
                message: "missing dependency".to_string(),
            })
        }
    }

    fn manager() -> PluginManager {
        let mut registry = Registry::new();
        register_builtin_components(&mut registry);
        PluginManager::new(RenderEngine::with_builtin_renderers(Arc::new(registry)))
    }

    fn render_button(engine: &RenderEngine) -> String {
        let node = create_node(engine.registry(), "button", Properties::new()).unwrap();
        let options = RenderOptions {
            add_scripts: false,
            ..Default::default()
        };
        engine.render_component(&node, &options).unwrap()
    }

    #[test]
    fn test_plugin_registers_component_and_renderer() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut plugins = manager();

        plugins
            .register(ButtonPlugin::boxed("1.0.0", "Click", &destroyed))
            .unwrap();

        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins.get("buttons").unwrap().name(), "Buttons");
        assert_eq!(render_button(plugins.engine()), "<button>Click</button>\n");
        assert!(plugins.engine().registry().contains("text"));
    }

    #[test]
    fn test_same_id_replaces_previous_plugin() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut plugins = manager();

        plugins
            .register(ButtonPlugin::boxed("1.0.0", "Click", &destroyed))
            .unwrap();
        plugins
            .register(ButtonPlugin::boxed("2.0.0", "Press", &destroyed))
            .unwrap();

        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins.get("buttons").unwrap().version(), "2.0.0");
        assert_eq!(render_button(plugins.engine()), "<button>Press</button>\n");
    }

    #[test]
    fn test_unregister_destroys_plugin() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut plugins = manager();
        plugins
            .register(ButtonPlugin::boxed("1.0.0", "Click", &destroyed))
            .unwrap();

        assert!(plugins.unregister("buttons"));
        assert!(!plugins.unregister("buttons"));
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert!(plugins.is_empty());
        assert!(!plugins.engine().registry().contains("button"));
        assert!(!plugins.engine().has_renderer("button"));
    }

    #[test]
    fn test_failed_initialize_is_not_kept() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut plugins = manager();
        plugins
            .register(ButtonPlugin::boxed("1.0.0", "Click", &destroyed))
            .unwrap();

        let err = plugins.register(Box::new(BrokenPlugin)).unwrap_err();
        assert!(matches!(err, PluginError::Failed { .. }));
        assert!(plugins.get("broken").is_none());

        let ids: Vec<&str> = plugins.list().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["buttons"]);
    }

    #[test]
    fn test_into_engine_keeps_plugin_types() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut plugins = manager();
        plugins
            .register(ButtonPlugin::boxed("1.0.0", "Go", &destroyed))
            .unwrap();

        let engine = plugins.into_engine();
        assert_eq!(render_button(&engine), "<button>Go</button>\n");
        assert_eq!(destroyed.load(Ordering::SeqCst), 0);
    }
}
