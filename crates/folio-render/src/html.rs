//! HTML text and URI encoding helpers.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped in URL paths; `/` and RFC 3986 sub-delimiters pass through.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Fragment characters: the path set without `?`.
const FRAGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Query component characters: fragment set plus the query separators.
const QUERY_ENCODE_SET: &AsciiSet = &FRAGMENT_ENCODE_SET.add(b'&').add(b'+').add(b'=').add(b'?');

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Percent-encode a URL path.
#[must_use]
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_ENCODE_SET).to_string()
}

/// Percent-encode a URL fragment (without the leading `#`).
#[must_use]
pub fn encode_fragment(fragment: &str) -> String {
    utf8_percent_encode(fragment, FRAGMENT_ENCODE_SET).to_string()
}

/// Percent-encode a single query parameter name or value.
#[must_use]
pub fn encode_query_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

/// Hex of the UTF-8 bytes, used for tree widget data attributes.
#[must_use]
pub fn hex_data(data: &str) -> String {
    hex::encode(data.as_bytes())
}

/// Append query parameters to an href, keeping any fragment last.
///
/// ```
/// use folio_render::html::append_params;
///
/// let params = vec![("q".to_owned(), "a b".to_owned())];
/// assert_eq!(append_params("/docs/page#top", &params), "/docs/page?q=a%20b#top");
/// assert_eq!(append_params("/docs/page?view=x", &params), "/docs/page?view=x&q=a%20b");
/// ```
#[must_use]
pub fn append_params(href: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return href.to_owned();
    }
    let (base, fragment) = match href.find('#') {
        Some(pos) => href.split_at(pos),
        None => (href, ""),
    };
    let mut out = String::with_capacity(href.len() + params.len() * 16);
    out.push_str(base);
    let mut separator = if base.contains('?') { '&' } else { '?' };
    for (name, value) in params {
        out.push(separator);
        out.push_str(&encode_query_component(name));
        out.push('=');
        out.push_str(&encode_query_component(value));
        separator = '&';
    }
    out.push_str(fragment);
    out
}
