//! Turn plain message text into HTML with links, embeds and emphasis
//!
//! Input is expected to be HTML-escaped already; markers never span `<` or `>`.

use once_cell::sync::Lazy;
use regex::Regex;

// http://, https://, ftp://
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(^|\s)((?:https?|ftp)://[a-z0-9\-+&@#/%?=~_|!:,.;]*[a-z0-9\-+&@#/%=~_|])([!?:,.;]*(?:$|\s))",
    )
    .expect("valid regex")
});

// www. without a scheme
static PSEUDO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)(^|\s)(www\.\S+)([!?:,.;]*(?:$|\s))").expect("valid regex")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(^|\s)([a-zA-Z0-9_\-]+@[a-zA-Z0-9_\-]+?(?:\.[a-zA-Z]{2,6})+)([!?:,.;]*(?:$|\s))",
    )
    .expect("valid regex")
});

static YOUTUBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(?:^|\s)(?:https?://)?(?:www\.)?(?:youtube\.com|youtu\.be)/(?:watch\?v=)?([^&\s]+)(?:&[^&\s]+)*([!?:,.;]*(?:$|\s))",
    )
    .expect("valid regex")
});

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)\*([^/*_<>]*)\*($|\s)").expect("valid regex"));

static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)_([^/*_<>]*)_($|\s)").expect("valid regex"));

const YOUTUBE_FRAME: &str = r#"<iframe width="427" height="240" src="http://www.youtube.com/embed/${1}" frameborder="0" allowfullscreen></iframe>"#;

/// Apply, in order: YouTube embeds, scheme URLs, `www.` URLs, e-mail
/// addresses, `*bold*` and `_italic_`.
pub fn linkify(text: &str) -> String {
    let text = YOUTUBE.replace_all(text, YOUTUBE_FRAME);
    let text = URL.replace_all(&text, r#"${1}<a target="_blank" href="${2}">${2}</a>${3}"#);
    let text = PSEUDO_URL.replace_all(&text, r#"${1}<a target="_blank" href="http://${2}">${2}</a>${3}"#);
    let text = EMAIL.replace_all(&text, r#"${1}<a href="mailto:${2}">${2}</a>${3}"#);
    let text = BOLD.replace_all(&text, "${1}<b>${2}</b>${3}");
    let text = ITALIC.replace_all(&text, "${1}<i>${2}</i>${3}");
    text.into_owned()
}
