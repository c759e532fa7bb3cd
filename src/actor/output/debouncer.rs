use std::path::PathBuf;
use std::time::{Duration, Instant};

use notify::{EventKind, event::ModifyKind};
use rustc_hash::FxHashSet;

use crate::utils::path::is_temp_file;

/// Quiet time after the last output write before a reload goes out.
pub(super) const SETTLE_MS: u64 = 150;

/// Pure debouncer: collects changed paths and reports when the burst settled.
pub(super) struct Debouncer {
    changes: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashSet::default(),
            last_event: None,
        }
    }

    /// Record the paths of a create, modify or remove event.
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => {}
            // mtime/atime/chmod noise
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => {}
            _ => return,
        }

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            self.changes.insert(path.clone());
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the settled burst, sorted, or `None` while writes are still coming.
    pub(super) fn take_if_ready(&mut self) -> Option<Vec<PathBuf>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;

        let mut changes: Vec<_> = std::mem::take(&mut self.changes).into_iter().collect();
        changes.sort();
        Some(changes)
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        last_event.elapsed() >= Duration::from_millis(SETTLE_MS) && !self.changes.is_empty()
    }

    /// Precise sleep duration until next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        Duration::from_millis(SETTLE_MS)
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}
