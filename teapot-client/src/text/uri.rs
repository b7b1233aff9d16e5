//! URL and path helpers

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
pub fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Append `key=value` to `url`, starting the query string if there is none
pub fn append_param(url: &str, key: &str, value: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}{}={}",
        url,
        sep,
        encode_uri_component(key),
        encode_uri_component(value)
    )
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decode `%XX` and `%uXXXX` escapes into code points.
///
/// Malformed escapes are kept verbatim.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        let decoded = if let Some(hex) = tail.strip_prefix('u') {
            hex.get(..4)
                .filter(|h| is_hex(h))
                .and_then(|h| u32::from_str_radix(h, 16).ok())
                .and_then(char::from_u32)
                .map(|c| (c, 5))
        } else {
            tail.get(..2)
                .filter(|h| is_hex(h))
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .map(|b| (b as char, 2))
        };

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('%');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Leading `folders` directories of an absolute URL path, with a trailing `/`.
///
/// `base_path("/alice/contacts/bob/chat", 1)` is `"/alice/"`.
pub fn base_path(pathname: &str, folders: usize) -> String {
    let segments: Vec<&str> = pathname.split('/').collect();
    let last = folders.min(segments.len().saturating_sub(1));

    let mut base = String::new();
    for segment in &segments[..=last] {
        base.push_str(segment);
        base.push('/');
    }
    base
}
