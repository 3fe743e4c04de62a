//! Session event plumbing between views and the host.
//!
//! Views never touch the session store directly. They hold a `ViewEvents`
//! handle bound to their session id and report loading/title changes
//! through it; the host drains the channel on its own event-handling
//! context and applies the updates centrally. A handle that outlives its
//! session is harmless because the store drops updates for unknown ids.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A state change reported by a view for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The view started or finished loading.
    LoadingChanged { session_id: String, loading: bool },
    /// The view reported a new page title.
    TitleUpdated { session_id: String, title: String },
}

impl SessionEvent {
    /// The session this event refers to.
    pub fn session_id(&self) -> &str {
        match self {
            Self::LoadingChanged { session_id, .. } => session_id,
            Self::TitleUpdated { session_id, .. } => session_id,
        }
    }
}

/// Creates a connected sink/source pair for session events.
pub fn session_event_channel() -> (SessionEventSink, SessionEventSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SessionEventSink { tx }, SessionEventSource { rx })
}

/// Sending half of the session event channel, held by the host.
#[derive(Debug, Clone)]
pub struct SessionEventSink {
    tx: UnboundedSender<SessionEvent>,
}

impl SessionEventSink {
    /// Binds the sink to a session id, producing the handle handed to a
    /// view when it is instantiated.
    pub fn bind(&self, session_id: impl Into<String>) -> ViewEvents {
        ViewEvents {
            session_id: session_id.into(),
            tx: self.tx.clone(),
        }
    }

    /// Sends a raw event. A closed channel is not an error: it only means
    /// the host has shut down and nobody is listening anymore.
    pub fn send(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

/// Per-session reporting handle handed to a view.
///
/// This replaces per-render callback closures with an explicit session id
/// threaded through one shared channel, so the late-callback-after-close
/// case is guarded in a single place (the store).
#[derive(Debug, Clone)]
pub struct ViewEvents {
    session_id: String,
    tx: UnboundedSender<SessionEvent>,
}

impl ViewEvents {
    /// The session this handle reports for.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Reports a loading state change.
    pub fn report_loading(&self, loading: bool) {
        let _ = self.tx.send(SessionEvent::LoadingChanged {
            session_id: self.session_id.clone(),
            loading,
        });
    }

    /// Reports a page title update.
    pub fn report_title(&self, title: impl Into<String>) {
        let _ = self.tx.send(SessionEvent::TitleUpdated {
            session_id: self.session_id.clone(),
            title: title.into(),
        });
    }
}

/// Receiving half of the session event channel, drained by the host.
#[derive(Debug)]
pub struct SessionEventSource {
    rx: UnboundedReceiver<SessionEvent>,
}

impl SessionEventSource {
    /// Drains all pending events without blocking, preserving the order in
    /// which they were reported.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
