//! CSS `url(...)` rewriting.
//!
//! Pattern-based, not a CSS parser: every `url(...)` reference, optionally
//! single- or double-quoted, goes through the URL resolution rule. `data:`
//! URIs and unresolvable references are left byte-identical.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use super::urls;

static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).unwrap());

/// Rewrite every proxyable `url(...)` reference in a stylesheet.
pub fn rewrite_css(css: &str, base: &Url) -> String {
    CSS_URL
        .replace_all(css, |caps: &Captures| {
            let reference = &caps[1];
            if reference.starts_with("data:") {
                return caps[0].to_string();
            }
            match urls::resolve(reference, base) {
                Some(absolute) => {
                    format!("url(\"/api/proxy?url={}\")", urls::encode_component(&absolute))
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/styles/site.css").unwrap()
    }

    #[test]
    fn test_relative_reference_rewritten() {
        let css = "body { background: url(bg.png); }";
        let out = rewrite_css(css, &base());
        assert_eq!(
            out,
            "body { background: url(\"/api/proxy?url=https%3A%2F%2Fexample.com%2Fstyles%2Fbg.png\"); }"
        );
    }

    #[test]
    fn test_quoted_references_rewritten() {
        let css = r#"@font-face { src: url("/fonts/a.woff2") format("woff2"); } .b { background: url('../i.gif'); }"#;
        let out = rewrite_css(css, &base());
        assert!(out.contains("url=https%3A%2F%2Fexample.com%2Ffonts%2Fa.woff2"));
        assert!(out.contains("url=https%3A%2F%2Fexample.com%2Fi.gif"));
    }

    #[test]
    fn test_data_uri_byte_identical() {
        let css = "div { background: url(data:image/gif;base64,R0lGODlh); }";
        assert_eq!(rewrite_css(css, &base()), css);
    }

    #[test]
    fn test_protocol_relative_reference() {
        let css = "div { background: url(//cdn.example.net/x.png); }";
        let out = rewrite_css(css, &base());
        assert!(out.contains("url=https%3A%2F%2Fcdn.example.net%2Fx.png"));
    }

    #[test]
    fn test_css_without_urls_unchanged() {
        let css = "body { color: red; margin: 0; }";
        assert_eq!(rewrite_css(css, &base()), css);
    }
}
