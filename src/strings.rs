use std::fmt::Display;

/// Replacements for characters that are unsafe inside an HTML attribute.
/// Applied in order so ampersands are not escaped twice.
const ATTR_ESCAPES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('\'', "&apos;"),
    ('"', "&quot;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
];

const XLATE: &[u8; 16] = b"0123456789abcdef";

/// Lowercase hex encoding of `bytes`.
pub fn hexlate(bytes: &[u8]) -> String {
    hexlate_n(bytes, bytes.len())
}

/// Lowercase hex encoding of at most the first `count` bytes.
pub fn hexlate_n(bytes: &[u8], count: usize) -> String {
    let count = count.min(bytes.len());
    let mut out = String::with_capacity(count * 2);
    for &byte in &bytes[..count] {
        out.push(XLATE[usize::from(byte >> 4)] as char);
        out.push(XLATE[usize::from(byte & 0x0f)] as char);
    }
    out
}

/// Decode a hex string produced by [`hexlate`]. Accepts either case.
///
/// Returns `None` for odd-length input or a non-hex digit.
pub fn unhexlate(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let high = hex_value(pair[0])?;
            let low = hex_value(pair[1])?;
            Some((high << 4) | low)
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// True when `text` is empty or only whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// `value` unless it is blank, `default` otherwise.
pub fn get_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if is_blank(value) { default } else { value }
}

/// Escape a value for use inside a quoted HTML attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ATTR_ESCAPES.iter().find(|(special, _)| *special == ch) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    out
}

/// Remove every character [`escape_attribute`] would have escaped.
pub fn sanitize_attribute(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ATTR_ESCAPES.iter().any(|(special, _)| special == ch))
        .collect()
}

/// Escape text content so it is never interpreted as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Cut `text` to at most `limit` characters.
pub fn truncate(text: &str, limit: usize) -> String {
    truncate_with(text, limit, "")
}

/// Cut `text` to at most `limit` characters, ending with `appendage` when
/// anything was removed.
pub fn truncate_with(text: &str, limit: usize, appendage: &str) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(appendage.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(appendage);
    out
}

/// Uppercase the first character. Blank strings come back unchanged.
pub fn capitalize(text: &str) -> String {
    if is_blank(text) {
        return text.to_string();
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}

/// Join items with `sep` between each consecutive pair.
pub fn join<I>(items: I, sep: &str) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(&item.to_string());
    }
    out
}

/// Join items with `", "`.
pub fn join_comma<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    join(items, ", ")
}

/// Apply a character limit to user input.
///
/// Returns the text cut to `max_chars` characters and how many characters
/// remain available.
pub fn limit_text(text: &str, max_chars: usize) -> (String, usize) {
    let limited = truncate(text, max_chars);
    let remaining = max_chars - limited.chars().count();
    (limited, remaining)
}
