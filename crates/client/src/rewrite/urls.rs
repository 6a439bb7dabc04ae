//! The URL resolution rule shared by the HTML and CSS rewriters.
//!
//! Given a candidate reference and the fetched resource's URL as base:
//! 1. `data:`, `javascript:`, `mailto:` and in-page `#` anchors are never
//!    proxied.
//! 2. Protocol-relative `//host/...` becomes `https://host/...`.
//! 3. Anything not already absolute http(s) is resolved against the base.
//! 4. The absolute URL is emitted as a proxy reference carrying it in a
//!    percent-encoded query parameter.
//!
//! A reference that fails resolution is left unchanged: a rewrite failure
//! must never remove content, only decline to rewrite it.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

/// Characters escaped the way `encodeURIComponent` escapes them, so the
/// injected page script and the server produce identical proxy references.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string for use as a query parameter value.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Resolve a candidate reference to an absolute URL, or `None` when the
/// reference must not be proxied (special schemes, anchors, resolution
/// failure).
pub fn resolve(raw: &str, base: &Url) -> Option<String> {
    if raw.starts_with("data:")
        || raw.starts_with("javascript:")
        || raw.starts_with("mailto:")
        || raw.starts_with('#')
    {
        return None;
    }

    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }

    base.join(raw).ok().map(|u| u.to_string())
}

/// Apply the resolution rule and emit a proxy reference, or echo the
/// original reference when it is not proxyable.
pub fn proxy_url(raw: &str, base: &Url) -> String {
    match resolve(raw, base) {
        Some(absolute) => format!("/api/proxy?url={}", encode_component(&absolute)),
        None => raw.to_string(),
    }
}
