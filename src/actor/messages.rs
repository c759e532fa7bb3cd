//! Actor Message Definitions
//!
//! ```text
//! FsActor --Render--> RenderActor
//! OutputActor --Reload--> WsActor <--AddClient-- ws listener
//! ```

use std::net::TcpStream;
use std::path::PathBuf;

use tungstenite::WebSocket;

/// Messages to RenderActor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderMsg {
    /// Run a full render pass.
    Render {
        /// Source path whose change caused the request (`None` for the
        /// initial pass).
        trigger: Option<PathBuf>,
    },
    /// Shutdown
    Shutdown,
}

/// Messages to WsActor
#[derive(Debug)]
pub enum WsMsg {
    /// Tell every client to reload.
    Reload {
        /// URL path of the changed output file, e.g. `/guide/intro.html`.
        path: String,
    },
    /// New client, already past the WebSocket handshake.
    AddClient(WebSocket<TcpStream>),
    /// Shutdown
    Shutdown,
}
