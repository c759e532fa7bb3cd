//! Terminal output.
//!
//! Two kinds of output share stdout:
//! - prefixed lines via `log!` / `debug!` (`[serve] listening on ...`)
//! - the render status block, which each finished pass redraws in place
//!
//! ```ignore
//! log!("render"; "{} failed", path.display());
//! debug!("watch"; "ignored {:?}", event.kind);
//! ```

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Style};
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable `debug!` output (`--verbose`).
pub fn set_verbose(on: bool) {
    VERBOSE.store(on, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Print a line under a `[module]` prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {
        $crate::logger::write_line($module, &format!($($arg)*))
    };
}

/// Like `log!`, printed only with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {
        if $crate::logger::is_verbose() {
            $crate::logger::write_line($module, &format!($($arg)*))
        }
    };
}

#[doc(hidden)]
pub fn write_line(module: &str, message: &str) {
    let prefix = format!("[{module}]");
    let prefix = prefix.style(prefix_style(module));

    let mut out = stdout().lock();
    queue!(out, Clear(ClearType::UntilNewLine)).ok();
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

fn prefix_style(module: &str) -> Style {
    let style = Style::new().bold();
    if module.eq_ignore_ascii_case("error") {
        style.bright_red()
    } else if module.eq_ignore_ascii_case("watch") {
        style.bright_green()
    } else if module.eq_ignore_ascii_case("render") {
        style.bright_magenta()
    } else if module.eq_ignore_ascii_case("serve") || module.eq_ignore_ascii_case("reload") {
        style.bright_blue()
    } else {
        style.bright_yellow()
    }
}

// ============================================================================
// render status block
// ============================================================================

/// Redrawable status block. Remembers how many lines it drew last so the
/// next report can erase them first.
struct StatusBlock {
    drawn: u16,
}

static STATUS: Mutex<StatusBlock> = Mutex::new(StatusBlock { drawn: 0 });

impl StatusBlock {
    fn draw(&mut self, ok: bool, text: &str) {
        let mark = if ok {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        let stamp = format!("[{}]", clock(unix_secs()));

        let mut out = stdout().lock();
        if self.drawn > 0 {
            queue!(out, cursor::MoveUp(self.drawn), Clear(ClearType::FromCursorDown)).ok();
        }
        writeln!(out, "{} {mark} {text}", stamp.dimmed()).ok();
        out.flush().ok();

        self.drawn = height(text);
    }
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// `HH:MM:SS` (UTC) for a unix timestamp.
fn clock(secs: u64) -> String {
    let (h, m, s) = ((secs / 3600) % 24, (secs / 60) % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}")
}

/// Terminal lines taken by `text`, saturating at `u16::MAX`.
fn height(text: &str) -> u16 {
    u16::try_from(text.lines().count().max(1)).unwrap_or(u16::MAX)
}

/// Report a successful pass.
pub fn status_success(message: &str) {
    STATUS.lock().draw(true, message);
}

/// Report a failed pass; `detail` goes on the lines below the summary.
pub fn status_error(summary: &str, detail: &str) {
    let text = if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    };
    STATUS.lock().draw(false, &text);
}
