//! Context-menu collaborator.
//!
//! Right-clicking a tab asks the extension host's menu builder for a
//! contextual action list. An empty list means no menu: the shell then
//! lets the platform's default context menu through.

use huddle_exts::OpenedApp;
use serde::{Deserialize, Serialize};

/// One entry of a contextual action list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Action id dispatched when the item is clicked.
    pub id: String,
    /// Localized label.
    pub label: String,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A menu to display at a pointer location.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuRequest {
    pub x: f32,
    pub y: f32,
    pub items: Vec<MenuItem>,
}

/// Builds the contextual action list for an opened app session.
///
/// `on_change` is invoked when building the menu already mutated derived
/// state (e.g. a recomputed default app) and the shell must re-render.
pub trait ContextMenuBuilder: Send + Sync {
    fn create_opened_app_context_menu(
        &self,
        session: &OpenedApp,
        on_change: &dyn Fn(),
    ) -> Vec<MenuItem>;
}

/// Default implementation offering no menu.
#[derive(Debug, Default)]
pub struct NoContextMenu;

impl ContextMenuBuilder for NoContextMenu {
    fn create_opened_app_context_menu(
        &self,
        _session: &OpenedApp,
        _on_change: &dyn Fn(),
    ) -> Vec<MenuItem> {
        Vec::new()
    }
}
