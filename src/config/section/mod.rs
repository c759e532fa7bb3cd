//! Configuration section definitions.

mod markdown;
mod serve;
mod source;

pub use markdown::MarkdownConfig;
pub use serve::ServeConfig;
pub use source::SourceConfig;
