//! Web search by scraping the DuckDuckGo HTML endpoint.
//!
//! Result extraction is plain pattern matching over the result page:
//! `result__a` anchors paired with the following `result__snippet`, with
//! DuckDuckGo's `uddg=` redirect wrapper unwrapped to the real target.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use veilweb_core::Error;

use crate::fetch::FetchClient;
use crate::rewrite::urls::encode_component;

/// Maximum number of results returned per query.
pub const MAX_RESULTS: usize = 10;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

static RESULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a[^>]+class="result__a"[^>]+href="([^"]+)"[^>]*>([^<]+)</a>.*?<a[^>]+class="result__snippet"[^>]*>([^<]+)"#,
    )
    .unwrap()
});

static UDDG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"uddg=([^&]+)").unwrap());

/// A single search result extracted from the provider's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Run a search query and return up to [`MAX_RESULTS`] results.
pub async fn search(client: &FetchClient, query: &str) -> Result<Vec<SearchResult>, Error> {
    let search_url = format!("{SEARCH_ENDPOINT}?q={}", encode_component(query));
    let url = Url::parse(&search_url).map_err(|e| Error::Search(e.to_string()))?;

    let page = client.fetch(&url).await?;
    let html = String::from_utf8_lossy(&page.bytes);
    let results = parse_results(&html);

    tracing::debug!(query, count = results.len(), "search complete");

    Ok(results)
}

/// Extract search results from a DuckDuckGo HTML result page.
pub fn parse_results(html: &str) -> Vec<SearchResult> {
    RESULT
        .captures_iter(html)
        .take(MAX_RESULTS)
        .map(|caps| SearchResult {
            url: unwrap_redirect(&caps[1]),
            title: caps[2].trim().to_string(),
            snippet: caps[3].trim().to_string(),
        })
        .collect()
}

/// Unwrap DuckDuckGo's `/l/?uddg=<encoded>` redirect to the real target,
/// and normalize protocol-relative links.
fn unwrap_redirect(href: &str) -> String {
    let url = match UDDG.captures(href) {
        Some(caps) => percent_decode_str(&caps[1])
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    };

    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_block(href: &str, title: &str, snippet: &str) -> String {
        format!(
            concat!(
                r#"<div class="result"><h2 class="result__title">"#,
                r#"<a rel="nofollow" class="result__a" href="{href}">{title}</a></h2>"#,
                r#"<a class="result__snippet" href="{href}">{snippet}</a></div>"#,
            ),
            href = href,
            title = title,
            snippet = snippet,
        )
    }

    #[test]
    fn test_parse_single_result() {
        let html = result_block("https://example.com/", "Example Domain", "An example page.");
        let results = parse_results(&html);
        assert_eq!(
            results,
            vec![SearchResult {
                url: "https://example.com/".into(),
                title: "Example Domain".into(),
                snippet: "An example page.".into(),
            }]
        );
    }

    #[test]
    fn test_parse_unwraps_uddg_redirect() {
        let html = result_block(
            "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc",
            "Example",
            "snippet",
        );
        let results = parse_results(&html);
        assert_eq!(results[0].url, "https://example.com/page");
    }

    #[test]
    fn test_parse_protocol_relative_url_normalized() {
        let html = result_block("//example.com/x", "T", "S");
        let results = parse_results(&html);
        assert_eq!(results[0].url, "https://example.com/x");
    }

    #[test]
    fn test_parse_caps_at_max_results() {
        let html: String = (0..15)
            .map(|i| result_block(&format!("https://example.com/{i}"), "T", "S"))
            .collect();
        let results = parse_results(&html);
        assert_eq!(results.len(), MAX_RESULTS);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let html = result_block("https://example.com/", "  Title  ", "  Snippet  ");
        let results = parse_results(&html);
        assert_eq!(results[0].title, "Title");
        assert_eq!(results[0].snippet, "Snippet");
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_results("<html><body>no results</body></html>").is_empty());
    }
}
