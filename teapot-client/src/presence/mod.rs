/*
    Presence - the contact list block.

    `ContactList` is the decoded contacts payload, `ContactListView` folds
    successive payloads into display entries and reports what changed, and
    `ContactsWatcher` drives the view from a poller and fires the
    new-message cues (notification, sound, title counter).
*/

mod contact;
mod view;
mod watcher;

pub use contact::{Contact, ContactList};
pub use view::{
    ContactEntry, ContactLink, ContactListView, LinkKind, NewMessages, PresenceEvent,
};
pub use watcher::ContactsWatcher;
