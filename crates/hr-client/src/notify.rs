use std::sync::Mutex;

use crate::lock;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// A transient user-facing notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    /// Rejected form input; nothing was sent.
    pub fn validation(description: impl Into<String>) -> Self {
        Self {
            title: "Validation Error".to_string(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

impl std::fmt::Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Where page controllers send their toasts.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Collects toasts in order; drained by whoever renders them.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *lock(&self.toasts))
    }

    pub fn last(&self) -> Option<Toast> {
        lock(&self.toasts).last().cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.toasts).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        lock(&self.toasts).push(toast);
    }
}
