use chrono::{DateTime, TimeDelta, Utc};

/// Latest expiry written: 9999-12-31T23:59:59Z, the last date with a four digit year.
const LATEST_EXPIRY_SECS: i64 = 253_402_300_799;

/// Characters passed through unchanged by [`escape`].
const UNRESERVED: &[u8] = b"@*_+-./";

/// The domain a cookie should be set on so sibling subdomains can read it.
///
/// `foo.bar.com` and `bar.com` both give `.bar.com`. Hostnames without a
/// dot, such as `localhost`, give `None`: no domain should be specified.
pub fn top_private_domain(hostname: &str) -> Option<String> {
    let last_dot = hostname.rfind('.')?;
    match hostname[..last_dot].rfind('.') {
        Some(second_dot) => Some(hostname[second_dot..].to_string()),
        None => Some(format!(".{hostname}")),
    }
}

/// A cookie to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSpec {
    pub name: String,
    pub value: String,
    /// Empty for no path attribute.
    pub path: String,
    /// Days until expiry. Zero makes a session cookie, negative expires it.
    pub expires_days: i64,
    pub domain: Option<String>,
}

impl CookieSpec {
    pub fn new(
        path: impl Into<String>,
        expires_days: i64,
        name: impl Into<String>,
        value: impl Into<String>,
        domain: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: path.into(),
            expires_days,
            domain,
        }
    }

    /// A cookie readable by every subdomain sharing `hostname`'s top private domain.
    pub fn cross_domain(
        path: impl Into<String>,
        expires_days: i64,
        name: impl Into<String>,
        value: impl Into<String>,
        hostname: &str,
    ) -> Self {
        Self::new(path, expires_days, name, value, top_private_domain(hostname))
    }

    /// A cookie that removes `name` when written.
    pub fn clear(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(path, -1, name, "", None)
    }

    /// The string to assign to `document.cookie`, with expiry relative to `now`.
    pub fn to_header_value(&self, now: DateTime<Utc>) -> String {
        let mut out = format!("{}={}", self.name, escape(&self.value));
        if !self.path.is_empty() {
            out.push_str("; path=");
            out.push_str(&self.path);
        }
        if let Some(domain) = &self.domain {
            out.push_str("; domain=");
            out.push_str(domain);
        }
        if self.expires_days != 0 {
            let expires = expiry_date(now, self.expires_days);
            out.push_str("; expires=");
            out.push_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        out
    }
}

/// `now` moved by `days`, kept between the Unix epoch and the end of year 9999.
fn expiry_date(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let latest =
        DateTime::<Utc>::from_timestamp(LATEST_EXPIRY_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC);
    match TimeDelta::try_days(days).and_then(|delta| now.checked_add_signed(delta)) {
        Some(date) => date.clamp(DateTime::<Utc>::UNIX_EPOCH, latest),
        None if days > 0 => latest,
        None => DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Find the value of cookie `name` in a `document.cookie` style string.
pub fn lookup(cookies: &str, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    let begin = match cookies.find(&format!("; {prefix}")) {
        Some(index) => index + 2,
        None if cookies.starts_with(&prefix) => 0,
        None => return None,
    };
    let value_start = begin + prefix.len();
    let value_end = cookies[value_start..]
        .find(';')
        .map_or(cookies.len(), |offset| value_start + offset);
    Some(unescape(&cookies[value_start..value_end]))
}

/// Escape a cookie value the way the browser `escape()` function does.
///
/// Alphanumerics and `@*_+-./` pass through. Other UTF-16 code units become
/// `%XX` up to 0xFF and `%uXXXX` above.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match u8::try_from(unit) {
            Ok(byte) if byte.is_ascii_alphanumeric() || UNRESERVED.contains(&byte) => {
                out.push(char::from(byte));
            }
            Ok(byte) => out.push_str(&format!("%{byte:02X}")),
            Err(_) => out.push_str(&format!("%u{unit:04X}")),
        }
    }
    out
}

/// Reverse [`escape`], as the browser `unescape()` function does: `%XX` is a
/// Latin-1 character and `%uXXXX` a UTF-16 code unit. Malformed escapes are
/// kept literally.
pub fn unescape(value: &str) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(value.len());
    let mut rest = value;
    while let Some(ch) = rest.chars().next() {
        if ch == '%' {
            if let Some((unit, len)) = parse_escape(&rest.as_bytes()[1..]) {
                units.push(unit);
                rest = &rest[1 + len..];
                continue;
            }
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(ch.encode_utf16(&mut buf));
        rest = &rest[ch.len_utf8()..];
    }
    String::from_utf16_lossy(&units)
}

/// The code unit of the escape following a `%`, and how many bytes it spans.
fn parse_escape(after_percent: &[u8]) -> Option<(u16, usize)> {
    match after_percent.split_first() {
        Some((b'u', digits)) => Some((parse_hex(digits.get(..4)?)?, 5)),
        _ => Some((parse_hex(after_percent.get(..2)?)?, 2)),
    }
}

fn parse_hex(digits: &[u8]) -> Option<u16> {
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let digits = std::str::from_utf8(digits).ok()?;
    u16::from_str_radix(digits, 16).ok()
}
