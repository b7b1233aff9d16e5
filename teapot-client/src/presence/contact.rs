//! Contact records as served by `/<user>/contacts/?json`

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One peer's presence, as of the last poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub tracker: Option<String>,

    /// `connected`, `found`, `disconnected`, ... used verbatim as a CSS class
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,

    /// Unread private messages
    #[serde(default, deserialize_with = "lenient_count")]
    pub messages: u32,

    /// Path prefix all of this contact's pages live under
    #[serde(default, deserialize_with = "lenient_string")]
    pub prefix: String,

    /// Set when some of the unread messages arrived since the last poll
    #[serde(default, deserialize_with = "lenient_flag")]
    pub newmessages: bool,
}

impl Contact {
    /// The local user's own identity is listed as a contact ending in `myself`
    pub fn is_self(&self) -> bool {
        self.prefix.ends_with("myself")
    }
}

/// Contacts keyed by identifier, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactList {
    #[serde(default, deserialize_with = "ordered_entries")]
    pub contacts: Vec<(String, Contact)>,
}

impl ContactList {
    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, contact)| contact)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

/// Counts arrive as numbers or decimal strings; anything else reads as 0
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().map_or(0, |n| n.min(u32::MAX as u64) as u32),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Flags are truthy: `true`, a non-empty string or a non-zero number
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// `null` reads as the empty string; numbers and booleans keep their text
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn ordered_entries<'de, D>(deserializer: D) -> Result<Vec<(String, Contact)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, Contact)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of contact identifiers to contacts")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Contact>()? {
                entries.push(entry);
            }
            Ok(entries)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(EntriesVisitor)
}
