//! Opened-app session domain model.
//!
//! This module contains the core `OpenedApp` entity that represents one
//! opened instance of an extension app within the host, independent of
//! whether it is currently visible. All mutable per-open state (loading
//! flag, reported page title) lives here; the static description stays on
//! the registry's `AppDescriptor`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One opened instance of an extension app.
///
/// Sessions are store-owned: they are created when an app is first opened,
/// survive in the background while other tabs are current, and are removed
/// only by an explicit close of a non-fixed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenedApp {
    /// Unique session id. Equals the app name for singleton apps, or a
    /// composed `name@<uuid>` id for multi-instance apps.
    pub id: String,
    /// Name of the owning `AppDescriptor`.
    pub app_name: String,
    /// URL path that activates this session.
    pub route_path: String,
    /// Opaque parameters passed at open time (e.g. a deep-link payload).
    pub params: Option<serde_json::Value>,
    /// Last reported loading state.
    pub loading: bool,
    /// Last reported page title; may be empty.
    pub page_title: String,
    /// When this session was first opened.
    pub opened_at: DateTime<Utc>,
}

impl OpenedApp {
    pub(crate) fn new(
        id: impl Into<String>,
        app_name: impl Into<String>,
        route_path: impl Into<String>,
        params: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            app_name: app_name.into(),
            route_path: route_path.into(),
            params,
            loading: false,
            page_title: String::new(),
            opened_at: Utc::now(),
        }
    }

    /// Returns the title to display for this session, falling back to the
    /// app's display name when no page title has been reported yet.
    pub fn effective_title<'a>(&'a self, display_name: &'a str) -> &'a str {
        if self.page_title.is_empty() {
            display_name
        } else {
            &self.page_title
        }
    }
}
