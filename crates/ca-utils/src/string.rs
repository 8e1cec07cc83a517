use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("unable to compile tag regex"));

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("unable to compile alnum regex"));

static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtu\.be/|youtube\.com/watch\?(?:[^#]*&)?v=)([A-Za-z0-9_-]+)",
    )
    .expect("unable to compile youtube regex")
});

/// Case-insensitive prefix test. An empty needle always matches.
pub fn starts_with(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().starts_with(&needle.to_lowercase())
}

/// Case-insensitive suffix test. An empty needle always matches.
pub fn ends_with(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().ends_with(&needle.to_lowercase())
}

/// Replaces only the first occurrence of `needle`.
///
/// An empty needle matches at position 0, so `replace` is prepended.
pub fn first_str_replace(haystack: &str, needle: &str, replace: &str) -> String {
    match haystack.find(needle) {
        Some(pos) => splice(haystack, pos, needle.len(), replace),
        None => haystack.to_string(),
    }
}

/// Replaces only the last occurrence of `needle`.
pub fn last_str_replace(haystack: &str, needle: &str, replace: &str) -> String {
    match haystack.rfind(needle) {
        Some(pos) => splice(haystack, pos, needle.len(), replace),
        None => haystack.to_string(),
    }
}

fn splice(haystack: &str, pos: usize, len: usize, replace: &str) -> String {
    let mut out = String::with_capacity(haystack.len() + replace.len());
    out.push_str(&haystack[..pos]);
    out.push_str(replace);
    out.push_str(&haystack[pos + len..]);
    out
}

/// Strips the brackets from an IPv6 literal such as `[::1]`.
pub fn plain(ip: &str) -> String {
    ip.replace(['[', ']'], "")
}

/// Splits `text` into at most `count` pieces and pads the result with empty strings.
///
/// The last piece keeps any remaining separators, so `host:port` style values always
/// yield exactly `count` entries.
///
/// # Examples
///
/// ```
/// use ca_utils::string::ca_explode;
///
/// assert_eq!(ca_explode(":", "192.168.1.1", 2), vec!["192.168.1.1", ""]);
/// assert_eq!(ca_explode(":", "a:b:c", 2), vec!["a", "b:c"]);
/// ```
pub fn ca_explode(separator: &str, text: &str, count: usize) -> Vec<String> {
    let count = count.max(1);
    let mut parts: Vec<String> = if separator.is_empty() {
        vec![text.to_string()]
    } else {
        text.splitn(count, separator).map(String::from).collect()
    };
    parts.resize(count, String::new());
    parts
}

/// Removes everything that is not an ASCII letter or digit.
pub fn alpha_numeric(s: &str) -> String {
    NON_ALNUM_RE.replace_all(s, "").into_owned()
}

/// Returns true for an absolute URL carrying a scheme and a host.
pub fn valid_url(s: &str) -> bool {
    Url::parse(s.trim()).is_ok_and(|url| url.has_host())
}

/// Removes `<...>` markup, leaving the enclosed text.
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Decodes an `application/x-www-form-urlencoded` value.
///
/// A `%` that is not followed by two hex digits is kept literally. Invalid UTF-8 is replaced
/// with the Unicode replacement character.
pub fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' => match hex_byte(bytes.get(i + 1..i + 3)) {
                Some(byte) => {
                    decoded.push(byte);
                    i += 2;
                }
                None => decoded.push(b'%'),
            },
            byte => decoded.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_byte(pair: Option<&[u8]>) -> Option<u8> {
    let pair = pair?;
    let digit = |b: u8| (b as char).to_digit(16);
    Some((digit(pair[0])? * 16 + digit(pair[1])?) as u8)
}

/// Maps a YouTube video link to its default thumbnail image.
///
/// Links that are not recognised are returned unchanged.
pub fn youtube_thumbnail(url: &str) -> String {
    match YOUTUBE_RE.captures(url) {
        Some(caps) => format!("https://img.youtube.com/vi/{}/default.jpg", &caps[1]),
        None => url.to_string(),
    }
}
