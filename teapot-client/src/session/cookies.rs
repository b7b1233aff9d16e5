//! `Cookie` header parsing and `document.cookie`-style assignments

use chrono::{DateTime, Duration, Utc};

use super::SessionContext;
use crate::text::unescape;

/// Cookies of one session, in header order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    pairs: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` header value such as `name=alice; auth_alice=1f2e`.
    ///
    /// Values are stored raw and unescaped on read. Pairs without `=` are
    /// kept with an empty value.
    pub fn parse(header: &str) -> Self {
        let pairs = header
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (name.trim().to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// Insert or replace a cookie, keeping its original position
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(n, _)| n != name);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize back into a `Cookie` header value
    pub fn to_header(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl SessionContext for CookieJar {
    fn cookie(&self, name: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| unescape(value))
    }

    fn cookie_names(&self) -> Vec<String> {
        self.pairs.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// `name=value[; expires=...]` expiring `expire_days` from now.
///
/// `None` or `Some(0)` makes a session cookie; negative days expire it.
pub fn set_cookie(name: &str, value: &str, expire_days: Option<i64>) -> String {
    set_cookie_at(Utc::now(), name, value, expire_days)
}

pub fn set_cookie_at(now: DateTime<Utc>, name: &str, value: &str, expire_days: Option<i64>) -> String {
    match expire_days.filter(|days| *days != 0) {
        Some(days) => {
            let expires = now + Duration::days(days);
            format!(
                "{}={}; expires={}",
                name,
                value,
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            )
        }
        None => format!("{}={}", name, value),
    }
}

/// Assignment that expires `name` immediately
pub fn unset_cookie(name: &str) -> String {
    set_cookie(name, "", Some(-1))
}
