//! Session context: which user is authenticated in this client
//!
//! The node sets a `name=<user>` cookie and an `auth_<user>=<token>` cookie on
//! login. Detection only reads them; it never validates the token.

mod cookies;

pub use cookies::{set_cookie, set_cookie_at, unset_cookie, CookieJar};

/// Read-only access to the cookies of the current session
pub trait SessionContext {
    /// Unescaped value of cookie `name`, if present
    fn cookie(&self, name: &str) -> Option<String>;

    /// Cookie names in the order the store holds them
    fn cookie_names(&self) -> Vec<String>;

    /// Present and non-empty
    fn check_cookie(&self, name: &str) -> bool {
        self.cookie(name).is_some_and(|value| !value.is_empty())
    }
}

const AUTH_PREFIX: &str = "auth_";

/// Identifier of the authenticated user, or `None` when nobody is logged in.
///
/// The `name` cookie wins when its matching `auth_` cookie is set; otherwise
/// the first `auth_<user>` cookie names the user.
pub fn authenticated_user(ctx: &impl SessionContext) -> Option<String> {
    if let Some(name) = ctx.cookie("name") {
        if !name.is_empty() && ctx.check_cookie(&format!("{}{}", AUTH_PREFIX, name)) {
            return Some(name);
        }
    }

    ctx.cookie_names().into_iter().find_map(|cookie| {
        cookie
            .strip_prefix(AUTH_PREFIX)
            .filter(|user| !user.is_empty())
            .map(crate::text::unescape)
    })
}
