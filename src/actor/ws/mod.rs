//! WebSocket Actor - Live Reload Broadcast
//!
//! This actor is responsible for:
//! - Greeting clients the listener has already handshaken
//! - Broadcasting reload messages to all connected clients
//! - Dropping clients that closed or errored
//!
//! # Architecture
//!
//! ```text
//! OutputActor --[Reload]--> WsActor --[broadcast]--> Clients
//! ws listener --[AddClient]--^
//! ```

mod client_io;
mod delivery;

use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::WsMsg;
use crate::reload::message::HotReloadMessage;

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Connected clients (shared for broadcast + read thread)
    clients: Clients,
    /// Stops the reader thread
    stopped: Arc<AtomicBool>,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        let stopped = Arc::clone(&self.stopped);
        std::thread::spawn(move || {
            client_io::client_reader_loop(&clients_for_reader, &stopped);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Reload { path } => {
                    crate::debug!("reload"; "reload {}", path);
                    let msg = HotReloadMessage::reload(path);
                    self.broadcast(Message::Text(msg.to_json().into()));
                }

                WsMsg::AddClient(ws) => self.add_client(ws),

                WsMsg::Shutdown => {
                    crate::debug!("reload"; "shutting down");
                    break;
                }
            }
        }

        self.stopped.store(true, Ordering::Relaxed);
        let mut clients = self.clients.lock();
        for mut ws in clients.drain(..) {
            let _ = ws.close(None);
            let _ = ws.flush();
        }
    }

    #[cfg(test)]
    fn client_count(&self) -> usize {
        self.clients.lock().len()
    }
}
