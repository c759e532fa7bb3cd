//! Directory listing for directories without `index.html`.

use std::fs;
use std::io;
use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::embed::serve::{DIRECTORY_HTML, ListingVars};
use crate::utils::html::escape;

/// Characters escaped in a listing href segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

struct Entry {
    name: String,
    is_dir: bool,
}

/// Render a listing of `dir`, requested as `/{request_path}`.
///
/// Only sub-directories and `.html` files are shown, hidden entries are
/// skipped, directories come first.
pub fn render_listing(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries: Vec<Entry> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            let visible = !name.starts_with('.') && (is_dir || name.ends_with(".html"));
            visible.then_some(Entry { name, is_dir })
        })
        .collect();
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

    let items: Vec<String> = entries
        .iter()
        .map(|entry| {
            let icon = if entry.is_dir { "📁" } else { "📄" };
            let segment = utf8_percent_encode(&entry.name, SEGMENT).to_string();
            let href = if request_path.is_empty() {
                format!("/{segment}")
            } else {
                format!("/{}/{segment}", encode_path(request_path))
            };
            let slash = if entry.is_dir { "/" } else { "" };
            format!(
                r#"<li><span class="icon">{icon}</span><a href="{}{slash}">{}{slash}</a></li>"#,
                escape(&href),
                escape(&entry.name)
            )
        })
        .collect();

    let entries_html = if items.is_empty() {
        r#"<li class="empty">No rendered documents yet.</li>"#.to_string()
    } else {
        items.join("\n        ")
    };

    let parent_link = if request_path.is_empty() {
        String::new()
    } else {
        let parent = Path::new(request_path)
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        let href = if parent.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", encode_path(&parent))
        };
        format!(r#"<li class="parent"><span class="icon">📂</span><a href="{href}">..</a></li>"#)
    };

    let display_path = format!("/{request_path}");
    Ok(DIRECTORY_HTML.render(&ListingVars {
        path: escape(&display_path).into_owned(),
        parent_link,
        entries: entries_html,
    }))
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|s| utf8_percent_encode(s, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("guide")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("b.html"), "").unwrap();
        fs::write(root.join("a note.html"), "").unwrap();
        fs::write(root.join("style.css"), "").unwrap();
        fs::write(root.join(".draft.html"), "").unwrap();
        temp
    }

    #[test]
    fn test_listing_filters_entries() {
        let temp = setup();
        let html = render_listing(temp.path(), "").unwrap();

        assert!(html.contains(r#"<a href="/guide/">guide/</a>"#));
        assert!(html.contains(r#"<a href="/b.html">b.html</a>"#));
        assert!(html.contains(r#"<a href="/a%20note.html">a note.html</a>"#));
        assert!(!html.contains("style.css"));
        assert!(!html.contains(".hidden"));
        assert!(!html.contains(".draft"));
        assert!(!html.contains(r#"class="parent""#));
    }

    #[test]
    fn test_directories_listed_first() {
        let temp = setup();
        let html = render_listing(temp.path(), "").unwrap();
        let dir = html.find("guide/").unwrap();
        let file = html.find("b.html").unwrap();
        assert!(dir < file);
    }

    #[test]
    fn test_nested_listing_has_parent_link() {
        let temp = setup();
        fs::create_dir_all(temp.path().join("guide/deep")).unwrap();
        fs::write(temp.path().join("guide/deep/x.html"), "").unwrap();

        let html = render_listing(&temp.path().join("guide/deep"), "guide/deep").unwrap();
        assert!(html.contains(r#"<a href="/guide/">..</a>"#));
        assert!(html.contains(r#"<a href="/guide/deep/x.html">x.html</a>"#));
        assert!(html.contains("Index of /guide/deep"));
    }

    #[test]
    fn test_empty_listing() {
        let temp = TempDir::new().unwrap();
        let html = render_listing(temp.path(), "").unwrap();
        assert!(html.contains("No rendered documents yet."));
    }
}
