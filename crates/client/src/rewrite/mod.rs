//! MIME-dispatched content rewriting.
//!
//! HTML and CSS bodies are rewritten so embedded references route back
//! through the proxy; everything else passes through untouched. Rewriting
//! is infallible by construction: every step declines rather than fails,
//! so a broken document degrades to "proxy without URL correction",
//! never to an error response.

use bytes::Bytes;
use url::Url;

mod css;
mod html;
pub mod urls;

pub use css::rewrite_css;
pub use html::rewrite_html;

/// A rewritten resource: output bytes plus the content type to emit.
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Rewrite fetched bytes according to their declared content type.
///
/// `text/html` and `text/css` (with any parameters) are rewritten against
/// `source`; other types pass through with their declared type, falling
/// back to `application/octet-stream` only when upstream declared none.
pub fn rewrite(bytes: &Bytes, content_type: Option<&str>, source: &Url) -> Rewritten {
    match content_type {
        Some(ct) if ct.contains("text/html") => {
            let html = String::from_utf8_lossy(bytes);
            let out = rewrite_html(&html, source);
            tracing::debug!(url = %source, "rewrote html");
            Rewritten { bytes: Bytes::from(out), content_type: ct.to_string() }
        }
        Some(ct) if ct.contains("text/css") => {
            let css = String::from_utf8_lossy(bytes);
            let out = rewrite_css(&css, source);
            tracing::debug!(url = %source, "rewrote css");
            Rewritten { bytes: Bytes::from(out), content_type: ct.to_string() }
        }
        Some(ct) => Rewritten { bytes: bytes.clone(), content_type: ct.to_string() },
        None => Rewritten { bytes: bytes.clone(), content_type: "application/octet-stream".to_string() },
    }
}
