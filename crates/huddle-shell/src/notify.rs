//! Notification surface.
//!
//! The shell reports user-visible conditions (e.g. app-not-found) through
//! this trait; the hosting application decides how to present them.

use std::sync::Mutex;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Warning,
    Error,
}

/// Where the notification is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessagePosition {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Presentation options for one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageOptions {
    pub kind: MessageKind,
    pub position: MessagePosition,
}

impl MessageOptions {
    pub fn warning_center() -> Self {
        Self {
            kind: MessageKind::Warning,
            position: MessagePosition::Center,
        }
    }
}

/// Notification collaborator implemented by the hosting application.
pub trait Messager: Send + Sync {
    fn show(&self, message: &str, options: MessageOptions);
}

/// Default implementation that only logs.
#[derive(Debug, Default)]
pub struct SilentMessager;

impl Messager for SilentMessager {
    fn show(&self, message: &str, options: MessageOptions) {
        tracing::info!(?options, "{message}");
    }
}

/// Test double recording everything shown.
#[derive(Debug, Default)]
pub struct RecordingMessager {
    shown: Mutex<Vec<(String, MessageOptions)>>,
}

impl RecordingMessager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, MessageOptions)> {
        self.shown.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Messager for RecordingMessager {
    fn show(&self, message: &str, options: MessageOptions) {
        self.shown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((message.to_string(), options));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_messager() {
        let messager = RecordingMessager::new();
        messager.show("hello", MessageOptions::warning_center());

        let messages = messager.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "hello");
        assert_eq!(messages[0].1.kind, MessageKind::Warning);
        assert_eq!(messages[0].1.position, MessagePosition::Center);
    }
}
