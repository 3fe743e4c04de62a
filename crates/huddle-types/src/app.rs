//! App descriptor domain model.
//!
//! This module contains the static description of an installable
//! mini-application as the registry owns it. Descriptors are read-only
//! at session time; all mutable per-open state lives on the opened
//! session, not here.

use serde::{Deserialize, Serialize};

/// Static descriptor of an extension app.
///
/// This is the "pure" model the extension host operates on. It is
/// independent of how the app was installed or packaged, and carries the
/// presentation metadata plus the flags the view resolver consults when
/// picking a rendering strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Stable identifier, unique within the registry.
    pub name: String,
    /// Human-readable name shown on the tab.
    pub display_name: String,
    /// Short description shown in tooltips.
    #[serde(default)]
    pub description: String,
    /// Icon reference (icon name or image path).
    #[serde(default)]
    pub app_icon: String,
    /// Accent color applied to the icon of the current tab.
    #[serde(default)]
    pub app_accent_color: String,
    /// Background color of the app's content pane.
    #[serde(default)]
    pub app_back_color: String,
    /// True when a statically bundled built-in view renders this app.
    #[serde(default)]
    pub build_in: bool,
    /// URL loaded in an embedded web view when no other strategy applies.
    #[serde(default)]
    pub direct_url: Option<String>,
    /// Fixed apps have no close affordance and cannot be closed.
    #[serde(default)]
    pub is_fixed: bool,
    /// Multi-instance apps get a composed session id per open.
    #[serde(default)]
    pub multi_instance: bool,
}

impl AppDescriptor {
    /// Creates a descriptor with the given name and display name and all
    /// other fields empty or false.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            app_icon: String::new(),
            app_accent_color: String::new(),
            app_back_color: String::new(),
            build_in: false,
            direct_url: None,
            is_fixed: false,
            multi_instance: false,
        }
    }

    /// Marks this descriptor as a built-in app.
    pub fn built_in(mut self) -> Self {
        self.build_in = true;
        self
    }

    /// Marks this descriptor as fixed (not user-closable).
    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    /// Sets the embedded web view URL.
    pub fn with_direct_url(mut self, url: impl Into<String>) -> Self {
        self.direct_url = Some(url.into());
        self
    }

    /// Allows multiple concurrently opened sessions of this app.
    pub fn allow_multi_instance(mut self) -> Self {
        self.multi_instance = true;
        self
    }
}
