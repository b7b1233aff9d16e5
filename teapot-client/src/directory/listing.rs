use serde_json::Value;
use tracing::debug;

use super::resource::{resource_link, Resource};
use crate::text::escape_html;

pub const EMPTY_INDICATOR: &str = "No files";
pub const FAILED_INDICATOR: &str = "Failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub name: String,
    pub link: String,
}

/// Result of one directory fetch, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Entries(Vec<ListingRow>),
    Empty,
    Failed,
}

impl Listing {
    /// Decode a listing body. Anything other than a non-empty array counts as
    /// empty; entries without a `url` are dropped.
    pub fn from_body(body: &str, user: Option<&str>) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value, user),
            Err(e) => {
                debug!(error = %e, "Listing body is not JSON");
                Listing::Failed
            }
        }
    }

    pub fn from_value(value: Value, user: Option<&str>) -> Self {
        let items = match value {
            Value::Array(items) if !items.is_empty() => items,
            _ => return Listing::Empty,
        };

        let rows = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Resource>(item) {
                Ok(resource) => Some(resource),
                Err(e) => {
                    debug!(error = %e, "Skipping malformed resource");
                    None
                }
            })
            .filter(|resource| resource.url().is_some())
            .map(|resource| ListingRow {
                link: resource_link(&resource, user),
                name: resource.name,
            })
            .collect();
        Listing::Entries(rows)
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Listing::Entries(_) => "entries",
            Listing::Empty => "empty",
            Listing::Failed => "failed",
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Listing::Entries(rows) => {
                let mut html = String::from("<table class=\"files\">");
                for row in rows {
                    html.push_str(&format!(
                        "<tr><td><a href=\"{}\">{}</a></td></tr>",
                        escape_html(&row.link),
                        escape_html(&row.name)
                    ));
                }
                html.push_str("</table>");
                html
            }
            Listing::Empty => EMPTY_INDICATOR.to_string(),
            Listing::Failed => FAILED_INDICATOR.to_string(),
        }
    }
}
