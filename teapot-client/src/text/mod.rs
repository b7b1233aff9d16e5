//! String helpers shared by the renderers
//!
//! Everything here is pure and allocation-only; no I/O.

mod format;
mod linkify;
mod uri;

pub use format::{capitalize, escape_html, format_bytes, format_time, format_time_in, is_json};
pub use linkify::linkify;
pub use uri::{append_param, base_path, encode_uri_component, unescape};
