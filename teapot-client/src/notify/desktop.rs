use tokio::sync::mpsc;
use tracing::{debug, info};

pub const NOTIFICATION_ICON: &str = "/static/icon.png";

/// Whether the user allowed desktop notifications.
///
/// Asking for permission happens outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    /// Not asked yet; treated as denied
    #[default]
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Notifications sharing a tag replace each other
    pub tag: String,
    pub icon: String,
    /// Where a click on the notification should navigate
    pub target: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tag: tag.into(),
            icon: NOTIFICATION_ICON.to_string(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Desktop notification channel
pub trait Notifier: Send + Sync {
    fn permission(&self) -> NotificationPermission;

    /// Display unconditionally
    fn show(&self, notification: Notification);

    /// Display if permission was granted. Returns whether it was shown.
    fn notify(&self, notification: Notification) -> bool {
        if self.permission() != NotificationPermission::Granted {
            debug!(tag = %notification.tag, "Notification suppressed, permission not granted");
            return false;
        }
        self.show(notification);
        crate::metrics::record_notification();
        true
    }
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy)]
pub struct TracingNotifier {
    permission: NotificationPermission,
}

impl TracingNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        Self { permission }
    }
}

impl Notifier for TracingNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn show(&self, notification: Notification) {
        info!(
            tag = %notification.tag,
            target = ?notification.target,
            "{}: {}",
            notification.title,
            notification.body
        );
    }
}

/// Hands notifications to whatever owns the receiving end
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    permission: NotificationPermission,
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(permission: NotificationPermission) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { permission, tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn show(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}
