//! Markdown format support.
//!
//! - [`convert`] - Markdown → HTML conversion via `pulldown-cmark`

pub mod convert;

pub use convert::render_markdown;
