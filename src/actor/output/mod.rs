//! Output Actor - watches the served directory
//!
//! One render pass writes many files. The actor gathers the resulting
//! notify events and, once the directory has been quiet for the settle
//! window, sends a single reload to WsActor.
//!
//! ```text
//! Watcher → Debouncer (settle timing) → WsMsg::Reload
//! ```

mod debouncer;

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::WsMsg;
use crate::utils::mime;
use debouncer::Debouncer;

/// Output Actor - turns output writes into reload notifications
pub struct OutputActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Channel to send messages to WsActor
    ws_tx: mpsc::Sender<WsMsg>,
    /// Watched output directory
    output_dir: PathBuf,
}

impl OutputActor {
    /// Watch `output_dir` recursively. The directory must exist.
    pub fn new(output_dir: PathBuf, ws_tx: mpsc::Sender<WsMsg>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(&output_dir, RecursiveMode::Recursive)?;

        Ok(Self {
            notify_rx,
            watcher,
            ws_tx,
            output_dir,
        })
    }

    /// Run the actor event loop until WsActor goes away.
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let ws_tx = self.ws_tx;
        let output_dir = self.output_dir;
        let _watcher = self.watcher;
        let mut debouncer = Debouncer::new();

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("reload"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    let Some(changed) = debouncer.take_if_ready() else {
                        continue;
                    };
                    let path = reload_target(&changed, &output_dir);
                    crate::debug!("reload"; "{} changed, reloading {}", changed.len(), path);
                    if ws_tx.send(WsMsg::Reload { path }).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// URL path for a file under the output directory: `<out>/a/b.html` → `/a/b.html`.
pub(crate) fn url_path(path: &Path, output_dir: &Path) -> String {
    let rel = path.strip_prefix(output_dir).unwrap_or(path);
    let segments: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("/{}", segments.join("/"))
}

/// Pick the path a reload reports: the first changed HTML file, else the
/// first changed file. `changed` is sorted and non-empty.
fn reload_target(changed: &[PathBuf], output_dir: &Path) -> String {
    changed
        .iter()
        .find(|p| mime::is_html(mime::from_path(p)))
        .or_else(|| changed.first())
        .map_or_else(|| "/".to_string(), |p| url_path(p, output_dir))
}
