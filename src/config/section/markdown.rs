//! `[markdown]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [markdown]
//! gfm = true            # GitHub-flavored extensions
//! tables = true         # Pipe tables
//! breaks = false        # Single newline becomes <br />
//! pedantic = false      # Plain CommonMark, extensions forced off
//! smart_lists = true    # Kept for compatibility, always on
//! smartypants = false   # Typographic punctuation
//! sanitize = true       # Drop raw HTML from the input
//! ```

use serde::{Deserialize, Serialize};

/// Markdown conversion options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Strikethrough, task lists, footnotes and GFM blockquote tags.
    pub gfm: bool,
    pub tables: bool,
    /// Render soft line breaks as `<br />`.
    pub breaks: bool,
    /// Disable every extension regardless of the flags above.
    pub pedantic: bool,
    /// CommonMark list parsing already behaves this way; the flag is
    /// accepted so existing configurations keep parsing.
    pub smart_lists: bool,
    pub smartypants: bool,
    /// Drop raw HTML blocks and inline HTML instead of passing them through.
    pub sanitize: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            tables: true,
            breaks: false,
            pedantic: false,
            smart_lists: true,
            smartypants: false,
            sanitize: true,
        }
    }
}
