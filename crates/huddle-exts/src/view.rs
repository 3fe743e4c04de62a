//! View resolution for opened sessions.
//!
//! Given a session and its descriptor, exactly one rendering strategy
//! applies. The dispatch is a strict priority chain over a tagged variant
//! rather than duck-typed property probing: a custom main view supplied by
//! the app wins, then a statically bundled built-in view, then the generic
//! embedded web view, and finally a stable placeholder.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::events::ViewEvents;
use crate::registry::RegisteredApp;
use crate::session::OpenedApp;

/// A live view instance produced by a `MainView` factory.
///
/// The host keeps every instantiated view mounted until its session is
/// closed, so background views retain their state across tab switches.
pub trait AppView: Send {
    /// Short tag used in logs and diagnostics.
    fn kind(&self) -> &'static str;

    /// Called after the view's container is mounted.
    fn mounted(&mut self) {}

    /// Called just before the view's container is unmounted.
    fn will_unmount(&mut self) {}
}

/// Factory for a custom view supplied by the app itself.
pub trait MainView: Send + Sync {
    /// Instantiates the view for a session. The `events` handle is the
    /// view's only channel back into the host.
    fn create(&self, session: &OpenedApp, events: ViewEvents) -> Box<dyn AppView>;
}

/// The statically-known built-in views, selected by app name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuiltInView {
    Home,
    Extensions,
    Files,
    Themes,
}

impl BuiltInView {
    /// Looks up the built-in view bundled for an app name, if any.
    pub fn for_app(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Self::Home),
            "extensions" => Some(Self::Extensions),
            "files" => Some(Self::Files),
            "themes" => Some(Self::Themes),
            _ => None,
        }
    }

    /// The app name this view is bundled for.
    pub fn app_name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Extensions => "extensions",
            Self::Files => "files",
            Self::Themes => "themes",
        }
    }
}

/// The rendering strategy resolved for one session.
#[derive(Clone)]
pub enum ResolvedView {
    /// Custom main view supplied by the app.
    Custom(Arc<dyn MainView>),
    /// Statically bundled view selected by app name.
    BuiltIn(BuiltInView),
    /// Generic embedded web view pointed at a URL.
    EmbeddedWeb(String),
    /// No strategy applies; the shell renders a placeholder instead.
    Unresolved,
}

impl ResolvedView {
    /// Short tag for logs and test assertions.
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Custom(_) => "custom",
            Self::BuiltIn(_) => "built-in",
            Self::EmbeddedWeb(_) => "embedded-web",
            Self::Unresolved => "unresolved",
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

impl fmt::Debug for ResolvedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::BuiltIn(view) => write!(f, "BuiltIn({view:?})"),
            Self::EmbeddedWeb(url) => write!(f, "EmbeddedWeb({url:?})"),
            Self::Unresolved => f.write_str("Unresolved"),
        }
    }
}

/// Resolves the rendering strategy for an app.
///
/// The precedence chain is strict: the first satisfied condition wins and
/// later conditions are not evaluated. An app flagged `build_in` without a
/// bundled view falls through to the web view check.
pub fn resolve_view(app: &RegisteredApp) -> ResolvedView {
    if let Some(main_view) = &app.main_view {
        return ResolvedView::Custom(main_view.clone());
    }
    if app.descriptor.build_in {
        if let Some(built_in) = BuiltInView::for_app(&app.descriptor.name) {
            return ResolvedView::BuiltIn(built_in);
        }
    }
    if let Some(url) = &app.descriptor.direct_url {
        return ResolvedView::EmbeddedWeb(url.clone());
    }
    ResolvedView::Unresolved
}
