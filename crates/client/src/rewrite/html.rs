//! HTML rewriting: attribute URLs, inline styles, and page-level injections.
//!
//! Deliberately pattern-based text transformation over a fixed attribute
//! vocabulary, not a DOM rewrite. Every step is best-effort: a candidate
//! that fails resolution is left in place, and a document that matches
//! nothing comes back unchanged.
//!
//! Rewriting the same document twice duplicates the injected blocks; the
//! engine is invoked once per fetched document, so this only matters for
//! idempotence testing.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use super::urls::proxy_url;

/// Runtime interception script, injected before `</body>`. Overrides
/// fetch, XMLHttpRequest.open, Image src assignment, and createElement for
/// script/img so script-initiated requests also route through the proxy.
const INTERCEPT_JS: &str = include_str!("../../assets/intercept.js");

/// Layout-normalization rules, injected before `</head>`.
const LAYOUT_CSS: &str = include_str!("../../assets/fixes.css");

static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(<(?:script|img|iframe|video|audio|source|track|embed)[^>]*\s+src\s*=\s*["'])([^"']+)(["'])"#)
        .unwrap()
});

// The value class excludes '#', so in-page anchors never match.
static HREF_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(<(?:link|a)[^>]*\s+href\s*=\s*["'])([^"'#]+)(["'])"#).unwrap());

static ACTION_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(<form[^>]*\s+action\s*=\s*["'])([^"']+)(["'])"#).unwrap());

static DATA_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(<[^>]*\s+data-[^=]*\s*=\s*["'])([^"']+)(["'])"#).unwrap());

static SRCSET_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)srcset\s*=\s*["']([^"']+)["']"#).unwrap());

static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)style\s*=\s*["']([^"']*url\([^)]+\)[^"']*)["']"#).unwrap());

static STYLE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).unwrap());

static META_SECURITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*http-equiv\s*=\s*["']?(?:Content-Security-Policy|X-Frame-Options)["']?[^>]*>"#)
        .unwrap()
});

static HEAD_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<head>").unwrap());
static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head>").unwrap());
static BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body>").unwrap());

/// Rewrite a fetched HTML document so every embedded reference routes back
/// through the proxy, anchored on the document's own URL.
pub fn rewrite_html(html: &str, source: &Url) -> String {
    let mut out = rewrite_attributes(html, source);

    // Anchor anything the attribute pass missed.
    if !out.contains("<base") {
        let origin = source.origin().ascii_serialization();
        if let Some(m) = HEAD_OPEN.find(&out) {
            let base_tag = format!("<base href=\"{origin}/\">");
            out.insert_str(m.end(), &base_tag);
        }
    }

    // CSP and frame restrictions would block the framed replay.
    out = META_SECURITY.replace_all(&out, "").into_owned();

    if let Some(m) = HEAD_CLOSE.find(&out) {
        let style_block = format!("<style id=\"proxy-fixes\">\n{LAYOUT_CSS}</style>");
        out.insert_str(m.start(), &style_block);
    }

    if let Some(m) = BODY_CLOSE.find(&out) {
        let script_block = format!("<script id=\"proxy-handler\">\n{INTERCEPT_JS}</script>");
        out.insert_str(m.start(), &script_block);
    }

    out
}

fn rewrite_attributes(html: &str, source: &Url) -> String {
    let wrap = |caps: &Captures| format!("{}{}{}", &caps[1], proxy_url(&caps[2], source), &caps[3]);

    let out = SRC_ATTR.replace_all(html, wrap).into_owned();
    let out = HREF_ATTR.replace_all(&out, wrap).into_owned();
    let out = ACTION_ATTR.replace_all(&out, wrap).into_owned();

    // data-* values are only rewritten when they already look like URLs.
    let out = DATA_ATTR
        .replace_all(&out, |caps: &Captures| {
            let value = &caps[2];
            if value.starts_with("http") || value.starts_with("//") {
                format!("{}{}{}", &caps[1], proxy_url(value, source), &caps[3])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned();

    let out = SRCSET_ATTR
        .replace_all(&out, |caps: &Captures| format!("srcset=\"{}\"", rewrite_srcset(&caps[1], source)))
        .into_owned();

    STYLE_ATTR
        .replace_all(&out, |caps: &Captures| {
            let rewritten = STYLE_URL.replace_all(&caps[1], |inner: &Captures| {
                format!("url({})", proxy_url(&inner[1], source))
            });
            format!("style=\"{rewritten}\"")
        })
        .into_owned()
}

/// Rewrite each URL in a srcset list independently, preserving descriptors.
fn rewrite_srcset(srcset: &str, source: &Url) -> String {
    srcset
        .split(',')
        .map(|candidate| {
            let mut parts: Vec<String> = candidate.split_whitespace().map(str::to_string).collect();
            if let Some(first) = parts.first_mut() {
                *first = proxy_url(first, source);
            }
            parts.join(" ")
        })
        .collect::<Vec<_>>()
        .join(", ")
}
