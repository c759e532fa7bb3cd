//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// What a request URL maps to under the serve root.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// A file to send (an exact match or a directory's `index.html`).
    File(PathBuf),
    /// A directory without `index.html`.
    Listing {
        dir: PathBuf,
        /// Cleaned request path without surrounding slashes (`""` at the root).
        request_path: String,
    },
    NotFound,
}

/// Resolve URL to a filesystem target
pub fn resolve_path(url: &str, serve_root: &Path) -> Resolved {
    let clean = normalize_url(url);

    // Parent segments only; `v1..2.html` is a legal name
    if clean.split(['/', '\\']).any(|segment| segment == "..") {
        return Resolved::NotFound;
    }

    let local = serve_root.join(&clean);

    // Canonicalize to resolve symlinks and verify path is under serve_root
    let (Ok(canonical), Ok(root_canonical)) = (local.canonicalize(), serve_root.canonicalize())
    else {
        return Resolved::NotFound;
    };

    if !canonical.starts_with(&root_canonical) {
        return Resolved::NotFound;
    }

    if canonical.is_file() {
        return Resolved::File(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Resolved::File(index);
        }
        return Resolved::Listing {
            dir: canonical,
            request_path: clean,
        };
    }

    Resolved::NotFound
}

/// Normalize URL: strip query string and fragment, decode, trim slashes
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    decoded.trim_matches('/').to_string()
}
