//! Extension host configuration.
//!
//! This module provides the `ExtsConfig` model (default app + app
//! descriptors, TOML on disk) and a `ConfigService` that loads it lazily
//! from the configuration file (~/.config/huddle/exts.toml by default),
//! caching the result to avoid repeated file I/O. User configuration is
//! merged over built-in defaults with `merge`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use huddle_types::{AppDescriptor, HostError, Result};
use serde::{Deserialize, Serialize};

/// Root configuration of the extension host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtsConfig {
    /// Name of the designated default app.
    #[serde(default)]
    pub default_app: Option<String>,
    /// Registered app descriptors.
    #[serde(default, rename = "app")]
    pub apps: Vec<AppDescriptor>,
}

impl ExtsConfig {
    /// Overlays another configuration onto this one: the overlay's default
    /// app wins when set, and overlay descriptors replace same-named
    /// entries (new names are appended in overlay order).
    pub fn merge(&mut self, overlay: ExtsConfig) {
        if overlay.default_app.is_some() {
            self.default_app = overlay.default_app;
        }
        for descriptor in overlay.apps {
            match self
                .apps
                .iter_mut()
                .find(|existing| existing.name == descriptor.name)
            {
                Some(existing) => *existing = descriptor,
                None => self.apps.push(descriptor),
            }
        }
    }
}

/// Configuration service that loads and caches the extension host
/// configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ExtsConfig>>>,
}

impl ConfigService {
    /// Creates a service reading from the default location under the user
    /// configuration directory.
    pub fn new() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("huddle")
            .join("exts.toml");
        Self::with_path(path)
    }

    /// Creates a service reading from an explicit path. Used by tests and
    /// portable installs.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// The configuration file path this service reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached. A missing
    /// file is created with defaults; an unreadable file falls back to
    /// defaults without failing the caller.
    pub fn get_config(&self) -> ExtsConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = read_lock.as_ref() {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), error = %err, "falling back to default config");
            ExtsConfig::default()
        });

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_config(&self) -> Result<ExtsConfig> {
        if !self.path.exists() {
            let default_config = ExtsConfig::default();
            self.save_config(&default_config)?;
            return Ok(default_config);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&raw)?)
    }

    fn save_config(&self, config: &ExtsConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(config).map_err(HostError::from)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
