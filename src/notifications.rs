//! Toast notifications
//!
//! A broadcast stream of short user-facing messages. Whoever renders them
//! (the CLI prints them after each command) subscribes; producers never
//! block when nobody is listening.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warn,
}

impl ToastKind {
    /// How long the message stays on screen unless overridden
    pub fn default_timeout(&self) -> Duration {
        match self {
            ToastKind::Success => Duration::from_millis(3000),
            ToastKind::Error => Duration::from_millis(5000),
            ToastKind::Info => Duration::from_millis(3500),
            ToastKind::Warn => Duration::from_millis(4000),
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
            ToastKind::Warn => "warn",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub timeout: Duration,
}

/// Cloneable handle publishing toasts to every subscriber
#[derive(Clone)]
pub struct Notifications {
    counter: Arc<AtomicU64>,
    sender: broadcast::Sender<Toast>,
}

impl Notifications {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            counter: Arc::new(AtomicU64::new(0)),
            sender,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    /// Publish a toast and return it
    pub fn show(&self, message: impl Into<String>, kind: ToastKind, timeout: Duration) -> Toast {
        let toast = Toast {
            id: self.counter.fetch_add(1, Ordering::Relaxed) + 1,
            kind,
            message: message.into(),
            timeout,
        };
        // No receivers is fine; the toast is simply dropped.
        let _ = self.sender.send(toast.clone());
        toast
    }

    pub fn success(&self, message: impl Into<String>) -> Toast {
        self.show(message, ToastKind::Success, ToastKind::Success.default_timeout())
    }

    pub fn error(&self, message: impl Into<String>) -> Toast {
        self.show(message, ToastKind::Error, ToastKind::Error.default_timeout())
    }

    pub fn info(&self, message: impl Into<String>) -> Toast {
        self.show(message, ToastKind::Info, ToastKind::Info.default_timeout())
    }

    pub fn warn(&self, message: impl Into<String>) -> Toast {
        self.show(message, ToastKind::Warn, ToastKind::Warn.default_timeout())
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect every toast already queued on `receiver` without waiting
pub fn drain(receiver: &mut broadcast::Receiver<Toast>) -> Vec<Toast> {
    let mut toasts = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(toast) => toasts.push(toast),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} notifications", skipped);
            }
            Err(_) => break,
        }
    }
    toasts
}
