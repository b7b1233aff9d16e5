//! Keeps a [`ContactListView`] in sync with the node's contacts endpoint
//! and raises the private message cues.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::contact::ContactList;
use super::view::{ContactListView, PresenceEvent};
use crate::client::Fetch;
use crate::navigation::Navigator;
use crate::notify::{MailSound, Notifier, UnreadTitle};
use crate::poller::{PollExit, Poller};
use crate::shutdown::CancellationToken;

pub struct ContactsWatcher<F: ?Sized> {
    poller: Poller<F>,
    cues: MessageCues,
    view: Arc<Mutex<ContactListView>>,
}

/// Outputs fired for every new private message
#[derive(Clone)]
struct MessageCues {
    notifier: Option<Arc<dyn Notifier>>,
    sound: Option<MailSound>,
    title: Option<Arc<Mutex<UnreadTitle>>>,
}

impl<F: Fetch + ?Sized + 'static> ContactsWatcher<F> {
    pub fn new(
        fetcher: Arc<F>,
        navigator: Arc<dyn Navigator>,
        url: impl Into<String>,
        period: Duration,
    ) -> Self {
        Self {
            poller: Poller::new(fetcher, navigator, url, period).endpoint("contacts"),
            cues: MessageCues {
                notifier: None,
                sound: None,
                title: None,
            },
            view: Arc::new(Mutex::new(ContactListView::new())),
        }
    }

    pub fn with_view(mut self, view: Arc<Mutex<ContactListView>>) -> Self {
        self.view = view;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.cues.notifier = Some(notifier);
        self
    }

    pub fn with_sound(mut self, sound: MailSound) -> Self {
        self.cues.sound = Some(sound);
        self
    }

    pub fn with_title(mut self, title: Arc<Mutex<UnreadTitle>>) -> Self {
        self.cues.title = Some(title);
        self
    }

    pub fn view(&self) -> Arc<Mutex<ContactListView>> {
        Arc::clone(&self.view)
    }

    pub fn spawn(self, token: CancellationToken) -> JoinHandle<PollExit> {
        let Self { poller, cues, view } = self;
        info!(url = %poller.url(), "Watching contacts");
        poller.spawn(token, move |payload: Option<ContactList>| {
            let view = Arc::clone(&view);
            let cues = cues.clone();
            async move {
                let events = view.lock().await.apply(payload.as_ref());
                cues.fire(&events).await;
            }
        })
    }
}

impl MessageCues {
    async fn fire(&self, events: &[PresenceEvent]) {
        let mut fired = false;
        for event in events {
            match event {
                PresenceEvent::NewMessages(new_messages) => {
                    if let Some(notifier) = &self.notifier {
                        notifier.notify(new_messages.notification());
                    }
                    if let Some(title) = &self.title {
                        let mut title = title.lock().await;
                        title.add(1);
                        debug!(title = %title.title(), "Unread title updated");
                    }
                    fired = true;
                }
                PresenceEvent::StatusChanged { contact, status } => {
                    debug!(contact = %contact, status = %status, "Contact status changed");
                }
                PresenceEvent::Added { contact } => {
                    debug!(contact = %contact, "Contact added");
                }
            }
        }

        if fired {
            if let Some(sound) = &self.sound {
                sound.play();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, ClientResult};
    use crate::navigation::ChannelNavigator;
    use crate::notify::{AudioSink, ChannelNotifier, NotificationPermission, PlaybackCapability};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    struct ScriptedContacts {
        bodies: StdMutex<Vec<ClientResult<String>>>,
    }

    impl ScriptedContacts {
        fn new(bodies: Vec<ClientResult<String>>) -> Arc<Self> {
            let mut bodies = bodies;
            bodies.reverse();
            Arc::new(Self {
                bodies: StdMutex::new(bodies),
            })
        }
    }

    #[async_trait]
    impl Fetch for ScriptedContacts {
        async fn fetch(&self, _url: &str, _timeout: Duration) -> ClientResult<String> {
            let next = self.bodies.lock().unwrap().pop();
            match next {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }
    }

    #[derive(Default)]
    struct CountingSink {
        plays: AtomicUsize,
    }

    impl AudioSink for CountingSink {
        fn load(&self, _source: &str) {}

        fn play(&self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Anything;

    impl PlaybackCapability for Anything {
        fn can_play_type(&self, _mime: &str) -> bool {
            true
        }
    }

    const TWO_UNREAD: &str = r#"{"contacts":{
        "alice":{"status":"connected","messages":0,"prefix":"/alice/myself","newmessages":false},
        "bob":{"status":"connected","messages":2,"prefix":"/alice/contacts/bob","newmessages":true},
        "carol":{"status":"found","messages":1,"prefix":"/alice/contacts/carol","newmessages":true}
    }}"#;

    #[tokio::test(start_paused = true)]
    async fn test_new_messages_fire_cues() {
        let fetcher = ScriptedContacts::new(vec![Ok(TWO_UNREAD.to_string())]);
        let (navigator, _nav_rx) = ChannelNavigator::new();
        let (notifier, mut notifications) = ChannelNotifier::new(NotificationPermission::Granted);
        let sink = Arc::new(CountingSink::default());
        let title = Arc::new(Mutex::new(UnreadTitle::new("TeapotNet")));

        let watcher = ContactsWatcher::new(
            fetcher,
            Arc::new(navigator),
            "/alice/contacts/?json",
            Duration::from_secs(5),
        )
        .with_notifier(Arc::new(notifier))
        .with_sound(MailSound::new(&Anything, sink.clone()))
        .with_title(Arc::clone(&title));
        let view = watcher.view();

        let token = CancellationToken::new();
        let handle = watcher.spawn(token.clone());

        let first = notifications.recv().await.unwrap();
        let second = notifications.recv().await.unwrap();
        assert_eq!(first.tag, "newmessage_bob");
        assert_eq!(second.tag, "newmessage_carol");

        token.cancel();
        assert_eq!(handle.await.unwrap(), PollExit::Cancelled);

        assert_eq!(sink.plays.load(Ordering::SeqCst), 1);
        assert_eq!(title.lock().await.title(), "(2) TeapotNet");

        let view = view.lock().await;
        let ids: Vec<&str> = view.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cycle_leaves_view_untouched() {
        let fetcher = ScriptedContacts::new(vec![
            Err(ClientError::Status(500)),
            Ok("null".to_string()),
        ]);
        let (navigator, _nav_rx) = ChannelNavigator::new();
        let view = Arc::new(Mutex::new(ContactListView::with_placeholder("Loading...")));

        let watcher = ContactsWatcher::new(
            fetcher,
            Arc::new(navigator),
            "/alice/contacts/?json",
            Duration::from_secs(5),
        )
        .with_view(Arc::clone(&view));

        let token = CancellationToken::new();
        let handle = watcher.spawn(token.clone());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(view.lock().await.placeholder(), Some("Loading..."));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(view.lock().await.placeholder(), None);

        token.cancel();
        assert_eq!(handle.await.unwrap(), PollExit::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_redirects_to_root() {
        let fetcher = ScriptedContacts::new(vec![Err(ClientError::Unauthorized)]);
        let (navigator, mut nav_rx) = ChannelNavigator::new();

        let watcher = ContactsWatcher::new(
            fetcher,
            Arc::new(navigator),
            "/alice/contacts/?json",
            Duration::from_secs(5),
        );
        let handle = watcher.spawn(CancellationToken::new());

        assert_eq!(handle.await.unwrap(), PollExit::Unauthorized);
        assert_eq!(nav_rx.recv().await.as_deref(), Some("/"));
    }
}
