use std::time::Duration;

use crossbeam::channel::{Receiver, TryRecvError};
use tokio::task::JoinHandle;

use super::{ReloadSide, WatchSide};
use crate::actor::messages::{RenderMsg, WsMsg};

/// Run all prepared actors concurrently until shutdown.
pub(super) async fn run_actors(
    watch: Option<WatchSide>,
    reload: Option<ReloadSide>,
    shutdown_rx: Receiver<()>,
) {
    // Watchers have no shutdown message: they are aborted.
    let mut watchers: Vec<JoinHandle<()>> = Vec::new();
    // Consumers drain their channel and stop on `Shutdown`.
    let mut consumers: Vec<JoinHandle<()>> = Vec::new();

    let render_tx = watch.map(|side| {
        consumers.push(tokio::spawn(side.render.run()));
        watchers.push(tokio::spawn(side.fs.run()));
        side.render_tx
    });

    let ws_tx = reload.map(|side| {
        side.listener.start(side.ws_tx.clone());
        consumers.push(tokio::spawn(side.ws.run()));
        watchers.push(tokio::spawn(side.output.run()));
        side.ws_tx
    });

    loop {
        match shutdown_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            Err(TryRecvError::Empty) => {}
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    for handle in &watchers {
        handle.abort();
    }
    if let Some(tx) = render_tx {
        let _ = tx.send(RenderMsg::Shutdown).await;
    }
    if let Some(tx) = ws_tx {
        let _ = tx.send(WsMsg::Shutdown).await;
    }

    for handle in consumers {
        let _ = tokio::time::timeout(Duration::from_millis(500), handle).await;
    }
}
