//! Actor System for Watch and Live Reload
//!
//! Message-passing concurrency for the long-running tasks:
//!
//! ```text
//! FsActor --RenderMsg--> RenderActor ==> output dir ==> OutputActor --WsMsg--> WsActor
//! (sources)              (full pass)      (disk)       (settle)              (broadcast)
//! ```
//!
//! The output directory on disk is the only link between the render side
//! and the reload side.
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - Source tree watcher, one render request per relevant event
//! - `render` - Sequential render pass consumer
//! - `output` - Output directory watcher with settle window
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod output;
pub mod render;
pub mod ws;

pub use coordinator::Coordinator;
