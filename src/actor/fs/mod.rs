//! FileSystem Actor
//!
//! Watches the source tree and sends one render request per relevant change.
//! The watcher is registered in [`FsActor::new`], so events that happen while
//! the caller runs the initial pass are buffered, not lost.
//!
//! Architecture:
//! ```text
//! notify thread → std channel → bridge thread → tokio channel → filter → RenderMsg
//! ```

use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::RenderMsg;
use crate::compiler::Renderer;

// Event relevance rules.
mod filter;

#[cfg(test)]
mod tests;

use filter::render_trigger;

/// FileSystem Actor - watches the source tree
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Channel to send messages to RenderActor
    render_tx: mpsc::Sender<RenderMsg>,
    /// Decides which paths are documents
    renderer: Arc<Renderer>,
}

impl FsActor {
    /// Register a recursive watch on the source root.
    ///
    /// Fails if the source root does not exist or cannot be watched.
    pub fn new(renderer: Arc<Renderer>, render_tx: mpsc::Sender<RenderMsg>) -> notify::Result<Self> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(renderer.source_dir(), RecursiveMode::Recursive)?;

        crate::debug!("watch"; "watching {}", renderer.source_dir().display());

        Ok(Self {
            notify_rx,
            watcher,
            render_tx,
            renderer,
        })
    }

    /// Run the actor event loop until RenderActor goes away.
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let render_tx = self.render_tx;
        let renderer = self.renderer;
        // Dropping the watcher ends the subscription.
        let _watcher = self.watcher;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        while let Some(event) = async_rx.recv().await {
            let Some(trigger) = render_trigger(&event, &renderer) else {
                continue;
            };

            crate::debug!("watch"; "{:?} {}", event.kind, trigger.display());
            let msg = RenderMsg::Render {
                trigger: Some(trigger),
            };
            if render_tx.send(msg).await.is_err() {
                break;
            }
        }
    }
}
