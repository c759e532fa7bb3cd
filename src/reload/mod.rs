//! Reload Module
//!
//! WebSocket-based live reload for the development server.
//!
//! ```text
//! OutputActor -> WsActor -> Browser
//!   (settle)   (broadcast)
//! ```
//!
//! # Modules
//!
//! - `message` - Live reload message types (reload, connected)
//! - `server` - WebSocket listener for client connections

pub mod message;
pub mod server;
