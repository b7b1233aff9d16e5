//! Alerts for new private messages: desktop notifications, the mail sound and
//! the unread counter in the window title.

mod desktop;
mod sound;
mod title;

pub use desktop::{
    ChannelNotifier, Notification, NotificationPermission, Notifier, TracingNotifier,
    NOTIFICATION_ICON,
};
pub use sound::{AudioFormat, AudioSink, MailSound, NullSink, PlaybackCapability};
pub use title::{ResetTrigger, UnreadTitle};
