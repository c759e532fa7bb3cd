//! Served content processing.

use crate::embed::serve::livereload_tag;
use crate::utils::mime;

/// Inject the live reload script if content is HTML and live reload is on
pub fn maybe_inject_livereload(body: Vec<u8>, content_type: &str, livereload: bool) -> Vec<u8> {
    if livereload && mime::is_html(content_type) {
        inject_livereload_script(&body)
    } else {
        body
    }
}

/// Inject the script tag before the last `</body>`, or append it.
fn inject_livereload_script(content: &[u8]) -> Vec<u8> {
    let script = livereload_tag();
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    let mut result = Vec::with_capacity(content.len() + script_bytes.len());

    // Reverse search for </body> using byte windows
    if let Some(pos) = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        result.extend_from_slice(&content[..pos]);
        result.extend_from_slice(script_bytes);
        result.extend_from_slice(&content[pos..]);
        return result;
    }

    // No </body> found (rendered fragments), append to end
    result.extend_from_slice(content);
    result.extend_from_slice(script_bytes);
    result
}
