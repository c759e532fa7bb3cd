//! Pluralization for log lines.

/// Format count with noun: `1 document`, `3 documents`, `0 clients`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
