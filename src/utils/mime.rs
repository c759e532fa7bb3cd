//! Content-Type lookup for files in the output directory.
//!
//! The output tree holds rendered HTML plus whatever assets the author
//! dropped next to their documents, so the table covers the usual static
//! web types and falls back to `application/octet-stream`.

use std::path::Path;

/// Content types the server writes itself.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Lowercase extension → content type.
const BY_EXTENSION: &[(&str, &str)] = &[
    ("html", types::HTML),
    ("htm", types::HTML),
    ("css", types::CSS),
    ("js", types::JAVASCRIPT),
    ("mjs", types::JAVASCRIPT),
    ("json", "application/json"),
    ("txt", types::PLAIN),
    ("md", "text/markdown; charset=utf-8"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("ico", "image/x-icon"),
    ("woff2", "font/woff2"),
    ("pdf", "application/pdf"),
];

/// Content type for `path`, judged by its extension alone.
pub fn from_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return types::OCTET_STREAM;
    };
    BY_EXTENSION
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(types::OCTET_STREAM, |&(_, content_type)| content_type)
}

/// Whether a content type denotes an HTML page.
pub fn is_html(content_type: &str) -> bool {
    content_type.starts_with("text/html")
}
