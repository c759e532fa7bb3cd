//! Markdown to HTML conversion using pulldown-cmark.

use pulldown_cmark::{Event, Options, Parser, html};

use crate::config::MarkdownConfig;

/// Convert `[markdown]` settings to pulldown-cmark Options.
///
/// `pedantic` keeps plain CommonMark: tables and GFM extensions stay off
/// even when enabled. Smart punctuation is independent of `pedantic`.
fn to_pulldown_options(config: &MarkdownConfig) -> Options {
    let mut opts = Options::empty();
    if config.smartypants {
        opts.insert(Options::ENABLE_SMART_PUNCTUATION);
    }
    if config.pedantic {
        return opts;
    }
    if config.tables {
        opts.insert(Options::ENABLE_TABLES);
    }
    if config.gfm {
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TASKLISTS);
        opts.insert(Options::ENABLE_FOOTNOTES);
        opts.insert(Options::ENABLE_GFM);
    }
    opts
}

/// Rewrite or drop a single event according to the config.
fn filter_event<'a>(event: Event<'a>, config: &MarkdownConfig) -> Option<Event<'a>> {
    match event {
        // Raw HTML never reaches the output when sanitizing.
        Event::Html(_) | Event::InlineHtml(_) if config.sanitize => None,
        Event::SoftBreak if config.breaks => Some(Event::HardBreak),
        other => Some(other),
    }
}

/// Render a Markdown document to an HTML fragment.
///
/// Pure and deterministic: the same input and config always produce the
/// same bytes.
pub fn render_markdown(markdown: &str, config: &MarkdownConfig) -> String {
    let parser = Parser::new_ext(markdown, to_pulldown_options(config));
    let events = parser.filter_map(|event| filter_event(event, config));

    let mut output = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut output, events);
    output
}
