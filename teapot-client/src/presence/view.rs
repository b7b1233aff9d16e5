//! Contact list view model
//!
//! Mirrors the contacts block of the web interface: one entry per contact,
//! own identities first, entries kept once seen.

use super::contact::{Contact, ContactList};
use crate::notify::Notification;
use crate::text::{capitalize, escape_html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Files,
    Board,
    Chat,
}

impl LinkKind {
    fn class(&self) -> &'static str {
        match self {
            LinkKind::Files => "linkfiles",
            LinkKind::Board => "linkboard",
            LinkKind::Chat => "linkchat",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            LinkKind::Files => "/static/icon_files.png",
            LinkKind::Board => "/static/icon_board.png",
            LinkKind::Chat => "/static/icon_chat.png",
        }
    }

    fn alt(&self) -> &'static str {
        match self {
            LinkKind::Files => "Files",
            LinkKind::Board => "Board",
            LinkKind::Chat => "Messages",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            LinkKind::Files => "/files/",
            LinkKind::Board => "/board/",
            LinkKind::Chat => "/chat/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLink {
    pub kind: LinkKind,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub id: String,
    pub display_name: String,
    pub prefix: String,
    pub is_self: bool,
    /// Raw status, also the entry's CSS class
    pub status: String,
    pub status_label: String,
    pub unread: u32,
    pub links: Vec<ContactLink>,
}

impl ContactEntry {
    fn new(id: &str, contact: &Contact) -> Self {
        let is_self = contact.is_self();
        Self {
            id: id.to_string(),
            display_name: if is_self { "Myself".to_string() } else { id.to_string() },
            prefix: contact.prefix.clone(),
            is_self,
            status: String::new(),
            status_label: String::new(),
            unread: 0,
            links: Vec::new(),
        }
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.prefix, LinkKind::Chat.path())
    }

    /// Unread badge linking to the chat, empty when nothing is unread
    pub fn badge_html(&self) -> String {
        if self.is_self || self.unread == 0 {
            return String::new();
        }
        format!(
            " <a href=\"{}\">({})</a>",
            escape_html(&self.chat_url()),
            self.unread
        )
    }

    pub fn render_html(&self) -> String {
        let id = escape_html(&self.id);
        let mut html = format!(
            "<div class=\"contactstr\"><div id=\"contact_{id}\" class=\"{status}\"><a href=\"{prefix}\">{name}</a>\
             <span class=\"messagescount\">{badge}</span><span class=\"status\">{label}</span></div>\
             <div id=\"contactinfo_{id}\" class=\"contactinfo\">",
            id = id,
            status = escape_html(&self.status),
            prefix = escape_html(&self.prefix),
            name = escape_html(&self.display_name),
            badge = self.badge_html(),
            label = escape_html(&self.status_label),
        );
        for link in &self.links {
            html.push_str(&format!(
                "<span class=\"{}\"><a href=\"{}\"><img src=\"{}\" alt=\"{}\"/></a></span>",
                link.kind.class(),
                escape_html(&link.href),
                link.kind.icon(),
                link.kind.alt()
            ));
        }
        html.push_str("</div></div>");
        html
    }

    fn update(&mut self, contact: &Contact) -> bool {
        let kinds: &[LinkKind] = if self.is_self {
            &[LinkKind::Files]
        } else {
            &[LinkKind::Files, LinkKind::Board, LinkKind::Chat]
        };
        self.prefix = contact.prefix.clone();
        self.links = kinds
            .iter()
            .map(|kind| ContactLink {
                kind: *kind,
                href: format!("{}{}", self.prefix, kind.path()),
            })
            .collect();
        if !self.is_self {
            self.unread = contact.messages;
        }

        let changed = self.status != contact.status;
        self.status = contact.status.clone();
        self.status_label = capitalize(&contact.status);
        changed
    }
}

/// Private messages waiting for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessages {
    pub contact: String,
    pub count: u32,
    pub chat_url: String,
}

impl NewMessages {
    pub fn notification(&self) -> Notification {
        Notification::new(
            format!("New private message from {}", self.contact),
            format!("({} unread messages)", self.count),
            format!("newmessage_{}", self.contact),
        )
        .with_target(self.chat_url.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceEvent {
    Added { contact: String },
    StatusChanged { contact: String, status: String },
    NewMessages(NewMessages),
}

#[derive(Debug, Clone, Default)]
pub struct ContactListView {
    placeholder: Option<String>,
    entries: Vec<ContactEntry>,
}

impl ContactListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text shown until the first successful poll, e.g. `Loading...`
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: Some(placeholder.into()),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ContactEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&ContactEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Fold one poll payload into the view
    pub fn apply(&mut self, list: Option<&ContactList>) -> Vec<PresenceEvent> {
        self.placeholder = None;
        let Some(list) = list else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for (id, contact) in &list.contacts {
            let index = match self.entries.iter().position(|entry| entry.id == *id) {
                Some(index) => index,
                None => {
                    let entry = ContactEntry::new(id, contact);
                    events.push(PresenceEvent::Added { contact: id.clone() });
                    if entry.is_self {
                        self.entries.insert(0, entry);
                        0
                    } else {
                        self.entries.push(entry);
                        self.entries.len() - 1
                    }
                }
            };

            let entry = &mut self.entries[index];
            if entry.update(contact) {
                events.push(PresenceEvent::StatusChanged {
                    contact: id.clone(),
                    status: entry.status.clone(),
                });
            }

            if !entry.is_self && contact.messages > 0 && contact.newmessages {
                events.push(PresenceEvent::NewMessages(NewMessages {
                    contact: id.clone(),
                    count: contact.messages,
                    chat_url: entry.chat_url(),
                }));
            }
        }
        events
    }

    pub fn render_html(&self) -> String {
        let mut html = String::new();
        if let Some(placeholder) = &self.placeholder {
            html.push_str(&format!("<p>{}</p>", escape_html(placeholder)));
        }
        for entry in &self.entries {
            html.push_str(&entry.render_html());
        }
        html
    }
}
