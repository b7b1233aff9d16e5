/*
    Client - GET requests against a TeapotNet node's web interface.

    Knows the node's base URL and the session cookie, maps HTTP statuses onto
    `ClientError`, and exposes the endpoint paths the renderers poll.
    The `Fetch` trait is the seam pollers and listers depend on.
*/

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use std::time::Duration;
use tracing::trace;

mod error;

pub use error::{ClientError, ClientResult};

use crate::config::ServerConfig;

/// One GET returning the response body
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Body of a 2xx response; 401 maps to [`ClientError::Unauthorized`]
    async fn fetch(&self, url: &str, timeout: Duration) -> ClientResult<String>;
}

/// Contacts of `user`, as JSON
pub fn contacts_path(user: &str) -> String {
    format!("/{}/contacts/?json", user)
}

/// Shared files of `user`, or of one of their contacts, as JSON
pub fn files_path(user: &str, contact: Option<&str>) -> String {
    match contact {
        Some(contact) => format!("/{}/contacts/{}/files/?json", user, contact),
        None => format!("/{}/myself/files/?json", user),
    }
}

#[derive(Debug, Clone)]
pub struct TeapotClient {
    http: reqwest::Client,
    base_url: String,
    cookie: Option<String>,
}

impl TeapotClient {
    pub fn new(config: &ServerConfig) -> ClientResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            cookie: config.cookie.clone(),
        })
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `target`; absolute inputs pass through unchanged
    pub fn url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else if target.starts_with('/') {
            format!("{}{}", self.base_url, target)
        } else {
            format!("{}/{}", self.base_url, target)
        }
    }
}

#[async_trait]
impl Fetch for TeapotClient {
    async fn fetch(&self, url: &str, timeout: Duration) -> ClientResult<String> {
        let url = self.url(url);
        trace!(%url, "GET");

        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(timeout);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Http(e)
            }
        })
    }
}
