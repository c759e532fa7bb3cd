//! `[serve]` section configuration.
//!
//! Contains development server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8000                 # HTTP port number
//! livereload = true           # Push reload notifications to browsers
//! livereload_port = 35729     # WebSocket port for live reload
//! open = true                 # Open the browser once the server is up
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Enable the live reload channel.
    pub livereload: bool,

    /// WebSocket port for the live reload channel.
    pub livereload_port: u16,

    /// Open the default browser on start.
    pub open: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8000,
            livereload: true,
            livereload_port: 35729,
            open: true,
        }
    }
}

impl ServeConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 || self.livereload_port == 0 {
            return Err(ConfigError::Validation(
                "serve.port and serve.livereload_port must be non-zero".into(),
            ));
        }
        if self.livereload && self.port == self.livereload_port {
            return Err(ConfigError::Validation(format!(
                "serve.port and serve.livereload_port must differ (both {})",
                self.port
            )));
        }
        Ok(())
    }

    /// Browser-facing URL of the HTTP server.
    pub fn url(&self) -> String {
        let host = if self.interface.is_unspecified() {
            "localhost".to_string()
        } else if self.interface.is_ipv6() {
            format!("[{}]", self.interface)
        } else {
            self.interface.to_string()
        };
        format!("http://{}:{}", host, self.port)
    }
}
