//! Diagnostic notifications.
//!
//! Non-fatal issues encountered while building or writing a document are
//! collected as [`Notification`] items rather than being silently dropped or
//! turned into hard errors. The sink is always passed in explicitly; nothing
//! in this crate reports through global state except the `log` facade that
//! [`NotificationCollection`] forwards to.

use std::fmt;

use crate::types::Handle;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A known object or section has no implementation and was skipped.
    NotImplemented,
    /// Feature exists but is not supported in this context.
    NotSupported,
    /// Non-fatal warning (e.g., dangling handle, misplaced owner).
    Warning,
    /// Error that was recovered from (e.g., bad group code value).
    Error,
}

impl NotificationType {
    /// Level used when the notification is forwarded to `log`.
    pub fn log_level(self) -> log::Level {
        match self {
            Self::NotImplemented | Self::NotSupported => log::Level::Debug,
            Self::Warning | Self::Error => log::Level::Warn,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::NotSupported => write!(f, "NotSupported"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single notification produced during reading or writing.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The severity / category.
    pub notification_type: NotificationType,
    /// A human-readable description of the issue.
    pub message: String,
    /// Object the notification is about, when there is one.
    pub handle: Option<Handle>,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
            handle: None,
        }
    }

    /// Attach the handle of the object concerned.
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle {
            Some(handle) => write!(
                f,
                "[{}] {} (handle {})",
                self.notification_type, self.message, handle
            ),
            None => write!(f, "[{}] {}", self.notification_type, self.message),
        }
    }
}

/// Receiver for non-fatal diagnostics.
///
/// Builders, readers and writers take a `&mut dyn DiagnosticsSink` so the
/// caller decides where notifications go.
pub trait DiagnosticsSink {
    /// Receive one notification.
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications during a read/write operation.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification built from its parts.
    pub fn push(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        DiagnosticsSink::notify(self, Notification::new(notification_type, message));
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Notifications attached to a specific object.
    pub fn for_handle(&self, handle: Handle) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|n| n.handle == Some(handle))
            .collect()
    }

    /// Move every notification of `other` into this collection.
    pub fn extend(&mut self, other: NotificationCollection) {
        self.items.extend(other.items);
    }

    /// Consume the collection into a `Vec`.
    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl DiagnosticsSink for NotificationCollection {
    fn notify(&mut self, notification: Notification) {
        log::log!(notification.notification_type.log_level(), "{}", notification);
        self.items.push(notification);
    }
}

impl IntoIterator for NotificationCollection {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
