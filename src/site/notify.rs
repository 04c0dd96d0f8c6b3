//! Toast notifications in the top-right corner. A new toast replaces the one
//! on screen.

use std::time::Duration;

/// Time a toast stays fully visible.
pub const SHOW_FOR: Duration = Duration::from_millis(4000);
pub const FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "notification notification-success",
            NotificationKind::Error => "notification notification-error",
            NotificationKind::Info => "notification notification-info",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            NotificationKind::Success => "#22c55e",
            NotificationKind::Error => "#ef4444",
            NotificationKind::Info => "#0ea5e9",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: ToastId,
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
    next_id: u64,
}

impl Notifier {
    /// Shows `message`, dropping any toast already on screen. The returned id
    /// is passed to [`Notifier::remove`] once `SHOW_FOR + FADE_OUT` has passed.
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.current = Some(Notification {
            id,
            message: message.into(),
            kind,
        });
        id
    }

    /// Removes the toast if it is still the one on screen.
    pub fn remove(&mut self, id: ToastId) -> Option<Notification> {
        if self.current.as_ref().is_some_and(|toast| toast.id == id) {
            self.current.take()
        } else {
            None
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_toast_survives_older_timer() {
        let mut toasts = Notifier::default();
        let first = toasts.show("Message sent successfully!", NotificationKind::Success);
        let second = toasts.show("Something went wrong", NotificationKind::Error);

        assert_eq!(toasts.remove(first), None);
        assert_eq!(toasts.current().map(|t| t.kind), Some(NotificationKind::Error));
        assert_eq!(toasts.remove(second).map(|t| t.message).as_deref(), Some("Something went wrong"));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn kind_styles() {
        assert_eq!(NotificationKind::Success.background(), "#22c55e");
        assert_eq!(NotificationKind::Info.class(), "notification notification-info");
    }
}
