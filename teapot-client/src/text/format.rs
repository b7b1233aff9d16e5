//! Display formatting: capitalization, sizes, timestamps, escaping

use chrono::{Local, TimeZone};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_]\S*").expect("valid regex"));

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Escape the three characters that matter inside HTML text and attributes
/// delimited by double quotes we never emit: `&`, `<`, `>`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Upper-case the first character of every word and lower-case the rest.
///
/// A word starts at an ASCII word character and runs to the next whitespace.
pub fn capitalize(s: &str) -> String {
    WORD.replace_all(s, |caps: &Captures<'_>| {
        let word = &caps[0];
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => {
                let mut out = first.to_uppercase().collect::<String>();
                out.push_str(&chars.as_str().to_lowercase());
                out
            }
            None => String::new(),
        }
    })
    .into_owned()
}

/// Human-readable size in powers of 1000.
///
/// `decimals` is the number of digits after the first significant one; `None`
/// gives three significant digits.
pub fn format_bytes(bytes: u64, decimals: Option<u32>) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let precision = decimals.map(|d| d + 1).unwrap_or(3).max(1);

    let mut unit = 0;
    let mut scale = 1u64;
    while unit < BYTE_UNITS.len() - 1 && bytes / scale >= 1000 {
        scale *= 1000;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    format!("{} {}", to_precision(value, precision), BYTE_UNITS[unit])
}

/// `value` rounded to `precision` significant digits. Ties round up, and the
/// exponent form is used once the integer part needs more digits than allowed.
fn to_precision(value: f64, precision: u32) -> String {
    let p = precision as i32;
    let mut exponent = value.log10().floor() as i32;
    let mut digits = (value * 10f64.powi(p - 1 - exponent)).round();
    if digits >= 10f64.powi(p) {
        exponent += 1;
        digits = (value * 10f64.powi(p - 1 - exponent)).round();
    }
    let digits = format!("{:.0}", digits);

    if exponent >= p || exponent < -6 {
        let (head, tail) = digits.split_at(1);
        let mantissa = if tail.is_empty() {
            head.to_string()
        } else {
            format!("{}.{}", head, tail)
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{}", mantissa, sign, exponent.abs());
    }

    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("0.{}{}", zeros, digits);
    }

    let split = (exponent + 1) as usize;
    if split >= digits.len() {
        digits
    } else {
        format!("{}.{}", &digits[..split], &digits[split..])
    }
}

/// `YYYY-MM-DD HH:MM:SS` in local time, `None` for out-of-range timestamps
pub fn format_time(unix_seconds: i64) -> Option<String> {
    format_time_in(&Local, unix_seconds)
}

pub fn format_time_in<Tz: TimeZone>(tz: &Tz, unix_seconds: i64) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    tz.timestamp_opt(unix_seconds, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Whether `s` parses as a JSON document
pub fn is_json(s: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(s).is_ok()
}
