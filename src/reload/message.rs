//! Live Reload Message Protocol
//!
//! JSON messages sent over WebSocket from the development server to browser
//! clients.
//!
//! # Message Types
//!
//! - `reload`: served files changed, reload the page
//! - `connected`: sent once after the handshake

use serde::{Deserialize, Serialize};

/// Live reload message sent over WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HotReloadMessage {
    /// Full page reload
    Reload {
        /// URL path of the changed output file
        path: String,
    },

    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },
}

impl HotReloadMessage {
    pub fn reload(path: impl Into<String>) -> Self {
        Self::Reload { path: path.into() }
    }

    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload","path":"/"}"#.to_string())
    }
}
