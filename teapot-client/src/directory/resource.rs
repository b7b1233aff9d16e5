use serde::Deserialize;

/// `type` tag of a listed resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ResourceKind {
    Directory,
    File,
    #[default]
    Unknown,
}

impl From<String> for ResourceKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "directory" => ResourceKind::Directory,
            "file" => ResourceKind::File,
            _ => ResourceKind::Unknown,
        }
    }
}

/// One entry of a files listing, as the node sends it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub name: String,
    pub hash: Option<String>,
    pub contact: Option<String>,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub url: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Resource {
    pub fn is_directory(&self) -> bool {
        self.kind == ResourceKind::Directory
    }

    pub fn url(&self) -> Option<&str> {
        non_empty(&self.url)
    }
}

/// Link target for `resource`.
///
/// A content hash always wins. With a viewing user the link is rebuilt under
/// that user's files tree; without one it is relative to the current page.
/// Directory links end with `/` in both of those cases.
pub fn resource_link(resource: &Resource, user: Option<&str>) -> String {
    if let Some(hash) = non_empty(&resource.hash) {
        return format!("/{}", hash);
    }

    let mut link = match user.filter(|u| !u.is_empty()) {
        Some(user) => {
            let mut link = format!("/{}", user);
            match non_empty(&resource.contact) {
                Some(contact) => {
                    link.push_str("/contacts/");
                    link.push_str(contact);
                }
                None => link.push_str("/myself"),
            }
            link.push_str("/files");
            let url = resource.url().unwrap_or_default();
            if !url.starts_with('/') {
                link.push('/');
            }
            link.push_str(url);
            link
        }
        None => resource.name.clone(),
    };

    if resource.is_directory() {
        link.push('/');
    }
    link
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, kind: &str, url: &str) -> Resource {
        Resource {
            name: name.to_string(),
            kind: ResourceKind::from(kind.to_string()),
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_bare_file_name() {
        assert_eq!(resource_link(&resource("a.txt", "file", "a.txt"), None), "a.txt");
    }

    #[test]
    fn test_bare_directory_gets_slash() {
        assert_eq!(resource_link(&resource("docs", "directory", "docs"), None), "docs/");
    }

    #[test]
    fn test_hash_wins() {
        let mut r = resource("docs", "directory", "/docs");
        r.hash = Some("deadbeef".to_string());
        r.contact = Some("bob".to_string());
        assert_eq!(resource_link(&r, Some("alice")), "/deadbeef");
    }

    #[test]
    fn test_own_files_under_user() {
        assert_eq!(
            resource_link(&resource("a.txt", "file", "music/a.txt"), Some("alice")),
            "/alice/myself/files/music/a.txt"
        );
        assert_eq!(
            resource_link(&resource("music", "directory", "/music"), Some("alice")),
            "/alice/myself/files/music/"
        );
    }

    #[test]
    fn test_contact_files_under_user() {
        let mut r = resource("a.txt", "file", "a.txt");
        r.contact = Some("bob".to_string());
        assert_eq!(resource_link(&r, Some("alice")), "/alice/contacts/bob/files/a.txt");
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let mut r = resource("a.txt", "file", "a.txt");
        r.hash = Some(String::new());
        r.contact = Some(String::new());
        assert_eq!(resource_link(&r, Some("alice")), "/alice/myself/files/a.txt");
        assert_eq!(resource_link(&r, Some("")), "a.txt");
    }

    #[test]
    fn test_deserialize_kind() {
        let r: Resource =
            serde_json::from_str(r#"{"name":"x","type":"directory","url":"x","size":3}"#).unwrap();
        assert!(r.is_directory());

        let r: Resource = serde_json::from_str(r#"{"name":"x","type":"link"}"#).unwrap();
        assert_eq!(r.kind, ResourceKind::Unknown);
        assert_eq!(r.url(), None);
    }
}
