//! Client side of the TeapotNet web interface.
//!
//! Polls a node for contact presence, renders contact lists and directory
//! listings, and raises the new-private-message cues. Everything talks to the
//! node through [`client::Fetch`], so the renderers run the same against a
//! live node or a test double.

pub mod client;
pub mod config;
pub mod directory;
pub mod logging;
pub mod metrics;
pub mod navigation;
pub mod notify;
pub mod poller;
pub mod presence;
pub mod session;
pub mod shutdown;
pub mod text;

pub use client::{contacts_path, files_path, ClientError, ClientResult, Fetch, TeapotClient};
pub use config::ClientConfig;
pub use directory::{DirectoryLister, Listing};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogLevel};
pub use poller::{PollExit, Poller};
pub use presence::{ContactList, ContactListView, ContactsWatcher};
pub use shutdown::{CancellationToken, ShutdownCoordinator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        let _ = ClientConfig::default();
        assert_eq!(contacts_path("alice"), "/alice/contacts/?json");
    }
}
