//! App registry.
//!
//! The registry maps an app identifier to its static descriptor plus an
//! optional custom main-view factory supplied by the app itself. It is
//! populated during startup (from configuration and installed extension
//! packages) and read-only once sessions start opening.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::ExtsConfig;
use crate::view::MainView;
use huddle_types::AppDescriptor;

/// A registered app: its descriptor and, when the app ships one, the
/// factory for its custom main view.
#[derive(Clone)]
pub struct RegisteredApp {
    pub descriptor: AppDescriptor,
    pub main_view: Option<Arc<dyn MainView>>,
}

impl RegisteredApp {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

impl fmt::Debug for RegisteredApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredApp")
            .field("descriptor", &self.descriptor)
            .field("main_view", &self.main_view.as_ref().map(|_| "<factory>"))
            .finish()
    }
}

/// Central registry of installable apps.
///
/// Registration order is preserved; it decides the fallback default app
/// and keeps diagnostics stable.
#[derive(Debug, Default)]
pub struct AppRegistry {
    apps: Vec<RegisteredApp>,
    aliases: HashMap<String, String>,
    default_app: Option<String>,
}

impl AppRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from configuration descriptors.
    pub fn from_config(config: &ExtsConfig) -> Self {
        let mut registry = Self::new();
        for descriptor in &config.apps {
            registry.register(descriptor.clone());
        }
        if let Some(name) = &config.default_app {
            registry.set_default_app(name.clone());
        }
        registry
    }

    /// Registers an app without a custom main view. A descriptor with a
    /// name already present replaces the earlier registration in place.
    pub fn register(&mut self, descriptor: AppDescriptor) {
        self.register_app(RegisteredApp {
            descriptor,
            main_view: None,
        });
    }

    /// Registers an app together with its custom main-view factory.
    pub fn register_with_view(&mut self, descriptor: AppDescriptor, main_view: Arc<dyn MainView>) {
        self.register_app(RegisteredApp {
            descriptor,
            main_view: Some(main_view),
        });
    }

    fn register_app(&mut self, app: RegisteredApp) {
        if let Some(existing) = self
            .apps
            .iter_mut()
            .find(|candidate| candidate.name() == app.name())
        {
            tracing::debug!(app = app.name(), "replacing registered app");
            *existing = app;
        } else {
            self.apps.push(app);
        }
    }

    /// Registers an alternate id resolving to an existing app name.
    pub fn alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    /// Designates the default app used when routing cannot resolve a
    /// target.
    pub fn set_default_app(&mut self, name: impl Into<String>) {
        self.default_app = Some(name.into());
    }

    /// Finds an app by id, resolving aliases.
    pub fn find(&self, id: &str) -> Option<&RegisteredApp> {
        if let Some(app) = self.apps.iter().find(|app| app.name() == id) {
            return Some(app);
        }
        let target = self.aliases.get(id)?;
        self.apps.iter().find(|app| app.name() == target)
    }

    /// True when `id` resolves to a registered app.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// The designated default app, falling back to the first built-in app
    /// and then to the first registered app.
    pub fn default_app(&self) -> Option<&RegisteredApp> {
        if let Some(name) = &self.default_app {
            if let Some(app) = self.find(name) {
                return Some(app);
            }
            tracing::warn!(app = %name, "designated default app is not registered");
        }
        self.apps
            .iter()
            .find(|app| app.descriptor.build_in)
            .or_else(|| self.apps.first())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredApp> {
        self.apps.iter()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> AppRegistry {
        let mut registry = AppRegistry::new();
        registry.register(AppDescriptor::new("wiki", "Wiki"));
        registry.register(AppDescriptor::new("home", "Home").built_in().fixed());
        registry.register(AppDescriptor::new("files", "Files").built_in());
        registry
    }

    #[test]
    fn test_find_direct_and_alias() {
        let mut registry = sample_registry();
        registry.alias("start", "home");

        assert_eq!(registry.find("wiki").unwrap().name(), "wiki");
        assert_eq!(registry.find("start").unwrap().name(), "home");
        assert!(registry.find("missing").is_none());
        assert!(registry.contains("start"));
    }

    #[test]
    fn test_default_app_fallback_chain() {
        let mut registry = AppRegistry::new();
        registry.register(AppDescriptor::new("wiki", "Wiki"));
        // No designated default, no built-in: first registered wins.
        assert_eq!(registry.default_app().unwrap().name(), "wiki");

        registry.register(AppDescriptor::new("home", "Home").built_in());
        // First built-in beats first registered.
        assert_eq!(registry.default_app().unwrap().name(), "home");

        registry.set_default_app("wiki");
        assert_eq!(registry.default_app().unwrap().name(), "wiki");
    }

    #[test]
    fn test_register_replaces_by_name() {
        let mut registry = sample_registry();
        let len = registry.len();
        registry.register(AppDescriptor::new("wiki", "Knowledge Base"));
        assert_eq!(registry.len(), len);
        assert_eq!(
            registry.find("wiki").unwrap().descriptor.display_name,
            "Knowledge Base"
        );
    }

    #[test]
    fn test_unregistered_default_falls_back() {
        let mut registry = sample_registry();
        registry.set_default_app("missing");
        // Falls back to the first built-in app.
        assert_eq!(registry.default_app().unwrap().name(), "home");
    }
}
