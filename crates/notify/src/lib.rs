//! pomo-notify - Desktop notifications for pomo
//!
//! Provides a unified cross-platform notification system for session ends.
//! Works on macOS (osascript/terminal-notifier), Linux (notify-send), and WSL.

mod backend;

pub use backend::{Backend, Notification};

use thiserror::Error;

/// Default notification title
pub const DEFAULT_TITLE: &str = "pomo";

/// Errors raised while delivering a notification
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to launch {backend}: {source}")]
    Spawn {
        backend: &'static str,
        source: std::io::Error,
    },

    #[error("{backend} failed with status: {status}")]
    Failed {
        backend: &'static str,
        status: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Something that can deliver a notification without blocking the caller
pub trait Notifier: Send + Sync {
    /// Fire a notification. Delivery failures are handled by the notifier.
    fn notify(&self, notification: Notification);
}

/// Sends notifications through the detected platform backend
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    backend: Backend,
}

impl DesktopNotifier {
    /// Use the best backend available on this host
    pub fn detect() -> Self {
        let backend = Backend::detect();
        tracing::debug!(backend = backend.name(), "notification backend selected");
        Self { backend }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: Notification) {
        let backend = self.backend;
        let spawned = std::thread::Builder::new()
            .name("pomo-notify".to_string())
            .spawn(move || {
                if let Err(err) = backend.send(&notification) {
                    tracing::warn!(error = %err, "desktop notification failed");
                }
            });

        if let Err(err) = spawned {
            tracing::warn!(error = %err, "could not start notification thread");
        }
    }
}

/// Drops every notification; used when notifications are disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct Muted;

impl Notifier for Muted {
    fn notify(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, "notification muted");
    }
}
