use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::{Clients, WsActor};
use crate::reload::message::HotReloadMessage;

impl WsActor {
    /// Greet a handshaken client and register it.
    pub(super) fn add_client(&self, mut ws: WebSocket<TcpStream>) {
        let connected = HotReloadMessage::connected();
        if let Err(e) = ws.send(Message::Text(connected.to_json().into())) {
            crate::log!("reload"; "failed to send connected message: {}", e);
            return;
        }

        // Reads are polled by the reader thread from here on
        let _ = ws.get_ref().set_nonblocking(true);

        let mut clients = self.clients.lock();
        clients.push(ws);
        crate::debug!("reload"; "client connected (total: {})", clients.len());
    }
}

/// Background thread to notice closed clients (non-blocking poll).
///
/// Clients never send anything meaningful; reads only surface `Close`
/// frames and connection errors.
pub(super) fn client_reader_loop(clients: &Clients, stopped: &AtomicBool) {
    while !stopped.load(Ordering::Relaxed) {
        std::thread::sleep(Duration::from_millis(100));

        let mut clients = clients.lock();
        clients.retain_mut(|ws| match ws.read() {
            Ok(Message::Close(_)) => false,
            Ok(_) => true,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {
                true
            }
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
    }
}
