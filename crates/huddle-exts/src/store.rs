//! Opened-app session store.
//!
//! Manages the ordered collection of currently opened app sessions and
//! tracks which one is current. The store is the single mutable resource
//! of the extension host and is only ever touched from the host's
//! event-handling context, so it needs no interior locking; it is an
//! explicitly owned value passed by reference into the router bridge and
//! the host shell.

use std::sync::Arc;

use huddle_types::{HostError, Result};
use uuid::Uuid;

use crate::events::SessionEvent;
use crate::registry::AppRegistry;
use crate::router;
use crate::session::OpenedApp;

/// Result of a successful `open_by_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new session was created and made current.
    Opened,
    /// An existing session was brought to the front.
    Activated,
}

/// Result of a successful `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOutcome {
    /// True when the closed session was current, meaning derived UI (the
    /// recomputed current tab) needs a forced refresh.
    pub needs_refresh: bool,
}

/// Ordered store of opened app sessions.
///
/// Invariants:
/// - session ids are unique at all times;
/// - exactly one session is current whenever the store is non-empty;
/// - fixed sessions are never removed;
/// - background sessions keep their last reported loading/title state.
#[derive(Debug)]
pub struct OpenedAppStore {
    registry: Arc<AppRegistry>,
    opened: Vec<OpenedApp>,
    current: Option<String>,
}

impl OpenedAppStore {
    /// Creates an empty store over a read-only registry.
    pub fn new(registry: Arc<AppRegistry>) -> Self {
        Self {
            registry,
            opened: Vec::new(),
            current: None,
        }
    }

    /// The registry this store resolves app ids against.
    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    /// Opens an app by id, creating a session on first open and activating
    /// the existing session otherwise. The id may be a session id (the
    /// composed id of a multi-instance session included), an app name, or
    /// an alias; a name with several instances open activates the most
    /// recently opened one. Parameters passed on a re-open replace the
    /// session's previous parameters.
    ///
    /// # Errors
    ///
    /// Returns `HostError::NotFound` when the id resolves to no registry
    /// entry; the current session is left unchanged in that case.
    pub fn open_by_id(
        &mut self,
        id: &str,
        params: Option<serde_json::Value>,
    ) -> Result<OpenOutcome> {
        // An exact session id wins over a registry name, so the composed
        // id of a multi-instance session re-activates that session.
        if let Some(index) = self.opened.iter().position(|session| session.id == id) {
            return Ok(self.activate_at(index, params));
        }

        let app = self
            .registry
            .find(id)
            .ok_or_else(|| HostError::not_found("app", id))?;
        let app_name = app.descriptor.name.clone();
        let multi_instance = app.descriptor.multi_instance;

        // An app name (or alias) activates the session opened most
        // recently for that app; fresh instances of a multi-instance app
        // go through `open_new_instance`.
        if let Some(index) = self
            .opened
            .iter()
            .rposition(|session| session.app_name == app_name)
        {
            return Ok(self.activate_at(index, params));
        }

        self.create_session(&app_name, multi_instance, params)
    }

    /// Opens a fresh session of a multi-instance app even when instances
    /// of it are already open. Behaves like `open_by_id` for singleton
    /// apps.
    ///
    /// # Errors
    ///
    /// Returns `HostError::NotFound` when the id resolves to no registry
    /// entry.
    pub fn open_new_instance(
        &mut self,
        id: &str,
        params: Option<serde_json::Value>,
    ) -> Result<OpenOutcome> {
        let app = self
            .registry
            .find(id)
            .ok_or_else(|| HostError::not_found("app", id))?;
        let app_name = app.descriptor.name.clone();
        if !app.descriptor.multi_instance {
            return self.open_by_id(&app_name, params);
        }
        self.create_session(&app_name, true, params)
    }

    fn activate_at(&mut self, index: usize, params: Option<serde_json::Value>) -> OpenOutcome {
        let session = &mut self.opened[index];
        if params.is_some() {
            session.params = params;
        }
        let session_id = session.id.clone();
        tracing::debug!(session = %session_id, "activating existing session");
        self.current = Some(session_id);
        OpenOutcome::Activated
    }

    fn create_session(
        &mut self,
        app_name: &str,
        multi_instance: bool,
        params: Option<serde_json::Value>,
    ) -> Result<OpenOutcome> {
        let session_id = if multi_instance {
            format!("{}@{}", app_name, Uuid::new_v4())
        } else {
            app_name.to_string()
        };
        let route_path = router::app_route(&session_id);
        tracing::debug!(session = %session_id, app = %app_name, "opening new session");
        self.opened
            .push(OpenedApp::new(&session_id, app_name, route_path, params));
        self.current = Some(session_id);
        Ok(OpenOutcome::Opened)
    }

    /// Opens the registry's default app.
    ///
    /// # Errors
    ///
    /// Returns `HostError::NotFound` when the registry is empty.
    pub fn open_default(&mut self) -> Result<OpenOutcome> {
        let name = self
            .registry
            .default_app()
            .map(|app| app.descriptor.name.clone())
            .ok_or_else(|| HostError::not_found("app", "<default>"))?;
        self.open_by_id(&name, None)
    }

    /// Marks an existing session as current. Returns false for unknown
    /// ids; a no-op (returning true) when the session is already current.
    pub fn activate(&mut self, session_id: &str) -> bool {
        if self.find(session_id).is_none() {
            return false;
        }
        if self.current.as_deref() != Some(session_id) {
            tracing::debug!(session = %session_id, "switching current session");
            self.current = Some(session_id.to_string());
        }
        true
    }

    /// Closes a non-fixed session.
    ///
    /// Closing the current session promotes a deterministic fallback: the
    /// session immediately preceding it in insertion order, then the one
    /// that took its index, and when the store empties the default app is
    /// reopened.
    ///
    /// # Errors
    ///
    /// Returns `HostError::Denied` for a fixed session or an unknown id.
    pub fn close(&mut self, session_id: &str) -> Result<CloseOutcome> {
        let index = self
            .opened
            .iter()
            .position(|session| session.id == session_id)
            .ok_or_else(|| HostError::denied(format!("unknown session '{session_id}'")))?;

        let app_name = &self.opened[index].app_name;
        let is_fixed = self
            .registry
            .find(app_name)
            .map(|app| app.descriptor.is_fixed)
            .unwrap_or(false);
        if is_fixed {
            return Err(HostError::denied(format!(
                "session '{session_id}' is fixed"
            )));
        }

        let was_current = self.current.as_deref() == Some(session_id);
        tracing::debug!(session = %session_id, was_current, "closing session");
        self.opened.remove(index);

        if was_current {
            let fallback = if index > 0 {
                self.opened.get(index - 1)
            } else {
                self.opened.first()
            };
            match fallback.map(|session| session.id.clone()) {
                Some(next) => self.current = Some(next),
                None => {
                    self.current = None;
                    if let Err(err) = self.open_default() {
                        tracing::warn!(error = %err, "no default app to promote after close");
                    }
                }
            }
        }

        Ok(CloseOutcome {
            needs_refresh: was_current,
        })
    }

    /// True when the given session is the current one.
    pub fn is_current(&self, session_id: &str) -> bool {
        self.current.as_deref() == Some(session_id)
    }

    /// The current session, if any. Only an uninitialized store has none.
    pub fn current(&self) -> Option<&OpenedApp> {
        let id = self.current.as_deref()?;
        self.opened.iter().find(|session| session.id == id)
    }

    /// All opened sessions in stable insertion order (tab order).
    pub fn list_open(&self) -> &[OpenedApp] {
        &self.opened
    }

    /// Finds a session by id.
    pub fn find(&self, session_id: &str) -> Option<&OpenedApp> {
        self.opened.iter().find(|session| session.id == session_id)
    }

    pub fn len(&self) -> usize {
        self.opened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opened.is_empty()
    }

    /// Records a loading state reported by a session's view. Updates for a
    /// session that no longer exists are dropped silently; a view may
    /// outlive its session by one late callback.
    pub fn report_loading(&mut self, session_id: &str, loading: bool) {
        match self.find_mut(session_id) {
            Some(session) => session.loading = loading,
            None => {
                tracing::debug!(session = %session_id, "dropping loading report for closed session")
            }
        }
    }

    /// Records a page title reported by a session's view; same tolerance
    /// for late callbacks as `report_loading`.
    pub fn report_title(&mut self, session_id: &str, title: &str) {
        match self.find_mut(session_id) {
            Some(session) => session.page_title = title.to_string(),
            None => {
                tracing::debug!(session = %session_id, "dropping title report for closed session")
            }
        }
    }

    /// Applies one drained session event.
    pub fn apply_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::LoadingChanged {
                session_id,
                loading,
            } => self.report_loading(&session_id, loading),
            SessionEvent::TitleUpdated { session_id, title } => {
                self.report_title(&session_id, &title)
            }
        }
    }

    fn find_mut(&mut self, session_id: &str) -> Option<&mut OpenedApp> {
        self.opened
            .iter_mut()
            .find(|session| session.id == session_id)
    }
}
