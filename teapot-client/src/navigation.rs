//! Where redirect requests go
//!
//! The embedding view decides what "navigate" means: load a page, switch a
//! screen, or quit.

use tokio::sync::mpsc;
use tracing::info;

/// Application root, the target of session-expiry redirects
pub const APP_ROOT: &str = "/";

pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
}

/// Logs the request and does nothing else
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, location: &str) {
        info!(location, "Navigation requested");
    }
}

/// Forwards every request to a channel
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, location: &str) {
        // A closed receiver means the view is already gone.
        let _ = self.tx.send(location.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_navigator_forwards() {
        let (navigator, mut rx) = ChannelNavigator::new();
        navigator.navigate(APP_ROOT);
        navigator.navigate("/alice/contacts/");
        assert_eq!(rx.try_recv().unwrap(), "/");
        assert_eq!(rx.try_recv().unwrap(), "/alice/contacts/");
    }

    #[test]
    fn test_channel_navigator_survives_closed_receiver() {
        let (navigator, rx) = ChannelNavigator::new();
        drop(rx);
        navigator.navigate(APP_ROOT);
    }
}
