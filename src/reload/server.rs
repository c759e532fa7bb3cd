//! WebSocket Server for Live Reload
//!
//! Accepts connections on the live reload port, completes the WebSocket
//! handshake on a short-lived thread per connection, and hands finished
//! clients to WsActor. A peer that never sends its upgrade request only
//! holds up its own thread, for at most [`HANDSHAKE_TIMEOUT`].

use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use crate::actor::messages::WsMsg;

/// Longest a connection may take to finish the upgrade request.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound live reload listener, not yet accepting.
pub struct WsListener {
    listener: TcpListener,
    addr: SocketAddr,
}

/// Bind the live reload port. A port already in use is a startup error.
pub fn bind_ws_server(interface: IpAddr, port: u16) -> Result<WsListener> {
    let addr = SocketAddr::new(interface, port);
    let listener = TcpListener::bind(addr)
        .with_context(|| format!("failed to bind live reload server on {addr}"))?;
    let addr = listener.local_addr()?;
    listener.set_nonblocking(true)?;
    Ok(WsListener { listener, addr })
}

impl WsListener {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Spawn the acceptor thread. It stops once WsActor is gone.
    pub fn start(self, ws_tx: mpsc::Sender<WsMsg>) {
        let listener = self.listener;
        std::thread::spawn(move || {
            loop {
                match listener.accept() {
                    Ok((stream, addr)) => {
                        crate::debug!("reload"; "connection from {}", addr);
                        let ws_tx = ws_tx.clone();
                        std::thread::spawn(move || match handshake(stream, HANDSHAKE_TIMEOUT) {
                            Ok(ws) => {
                                let _ = ws_tx.blocking_send(WsMsg::AddClient(ws));
                            }
                            Err(e) => crate::debug!("reload"; "handshake with {} failed: {:#}", addr, e),
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        if ws_tx.is_closed() {
                            break;
                        }
                        std::thread::sleep(std::time::Duration::from_millis(100));
                    }
                    Err(e) => {
                        crate::log!("reload"; "accept error: {}", e);
                        std::thread::sleep(std::time::Duration::from_millis(100));
                    }
                }
            }
        });
    }
}

/// Run the server side of the WebSocket handshake, bounded by `timeout`.
///
/// The returned socket is blocking with no timeouts set.
pub fn handshake(stream: TcpStream, timeout: Duration) -> Result<WebSocket<TcpStream>> {
    // Accepted sockets may inherit non-blocking mode from the listener
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let ws = tungstenite::accept(stream).map_err(|e| anyhow::anyhow!("{e}"))?;
    ws.get_ref().set_read_timeout(None)?;
    ws.get_ref().set_write_timeout(None)?;
    Ok(ws)
}
