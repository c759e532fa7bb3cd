//! Process-wide Ctrl+C state.
//!
//! Long-running modes register what has to be stopped: the HTTP server
//! (blocked in `recv`) and the actor runtime (waiting on a crossbeam
//! channel). A one-shot `md` run registers nothing and is simply exited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use anyhow::anyhow;
use crossbeam::channel::Sender;
use tiny_http::Server;

struct Registry {
    requested: AtomicBool,
    server: OnceLock<Arc<Server>>,
    actors: OnceLock<Sender<()>>,
}

static REGISTRY: Registry = Registry {
    requested: AtomicBool::new(false),
    server: OnceLock::new(),
    actors: OnceLock::new(),
};

impl Registry {
    fn interrupt(&self) {
        self.requested.store(true, Ordering::SeqCst);

        let (server, actors) = (self.server.get(), self.actors.get());
        if server.is_none() && actors.is_none() {
            std::process::exit(0);
        }

        crate::log!("serve"; "shutting down...");
        if let Some(tx) = actors {
            // A closed channel means the actors are already gone.
            let _ = tx.send(());
        }
        if let Some(server) = server {
            server.unblock();
        }
    }
}

/// Install the Ctrl+C handler. Call once, before anything registers.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| REGISTRY.interrupt())
        .map_err(|e| anyhow!("failed to set Ctrl+C handler: {e}"))
}

/// Register the bound HTTP server so Ctrl+C can unblock its request loop.
pub fn register_server(server: Arc<Server>) {
    let _ = REGISTRY.server.set(server);
}

/// Register the sender the coordinator polls for shutdown.
pub fn register_shutdown(tx: Sender<()>) {
    let _ = REGISTRY.actors.set(tx);
}

/// Whether Ctrl+C has been received.
pub fn is_shutdown() -> bool {
    REGISTRY.requested.load(Ordering::Relaxed)
}
