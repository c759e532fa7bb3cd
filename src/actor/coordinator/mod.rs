//! Actor Coordinator - Wires up the Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Performs every fallible setup step up front (watch registration,
//!   live reload bind), so startup errors surface before anything runs
//! - Runs the actors concurrently until shutdown

mod runtime;

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::{RenderMsg, WsMsg};
use super::output::OutputActor;
use super::render::RenderActor;
use super::ws::WsActor;
use crate::compiler::Renderer;
use crate::config::Config;
use crate::reload::server::{WsListener, bind_ws_server};

const CHANNEL_BUFFER: usize = 32;

/// Source watch half: FsActor feeding RenderActor.
struct WatchSide {
    fs: FsActor,
    render: RenderActor,
    render_tx: mpsc::Sender<RenderMsg>,
}

/// Live reload half: OutputActor feeding WsActor, plus the listener.
struct ReloadSide {
    output: OutputActor,
    ws: WsActor,
    ws_tx: mpsc::Sender<WsMsg>,
    listener: WsListener,
}

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    watch: Option<WatchSide>,
    reload: Option<ReloadSide>,
}

impl Coordinator {
    /// Set up the actors a task needs.
    ///
    /// - `watch`: register the source watch and the render consumer
    /// - `livereload`: bind the WebSocket port and watch the output directory
    pub fn prepare(
        config: &Config,
        renderer: &Arc<Renderer>,
        watch: bool,
        livereload: bool,
    ) -> Result<Self> {
        let watch = if watch {
            let (render_tx, render_rx) = mpsc::channel::<RenderMsg>(CHANNEL_BUFFER);
            let fs = FsActor::new(Arc::clone(renderer), render_tx.clone()).with_context(|| {
                format!("failed to watch {}", config.root_relative(renderer.source_dir()).display())
            })?;
            let render = RenderActor::new(render_rx, Arc::clone(renderer));
            Some(WatchSide {
                fs,
                render,
                render_tx,
            })
        } else {
            None
        };

        let reload = if livereload {
            let listener = bind_ws_server(config.serve.interface, config.serve.livereload_port)?;
            crate::debug!("reload"; "ws://{}", listener.addr());

            let output_dir = renderer.output_dir().to_path_buf();
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("failed to create {}", output_dir.display()))?;

            let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);
            let output = OutputActor::new(output_dir, ws_tx.clone())
                .context("failed to watch output directory")?;
            Some(ReloadSide {
                output,
                ws: WsActor::new(ws_rx),
                ws_tx,
                listener,
            })
        } else {
            None
        };

        Ok(Self { watch, reload })
    }

    /// Whether any actor would run.
    pub fn is_empty(&self) -> bool {
        self.watch.is_none() && self.reload.is_none()
    }

    #[cfg(test)]
    fn livereload_addr(&self) -> Option<std::net::SocketAddr> {
        self.reload.as_ref().map(|side| side.listener.addr())
    }

    /// Run the actor system until `shutdown_rx` fires.
    pub async fn run(self, shutdown_rx: Receiver<()>) {
        crate::debug!("actor"; "start");
        runtime::run_actors(self.watch, self.reload, shutdown_rx).await;
        crate::debug!("actor"; "stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::path::normalize_path;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn setup(toml: &str) -> (TempDir, Config, Arc<Renderer>) {
        let temp = TempDir::new().unwrap();
        let mut config = crate::config::test_parse_config(toml);
        config.set_root(&normalize_path(temp.path()));
        std::fs::create_dir_all(&config.source.dir).unwrap();
        let renderer = Arc::new(Renderer::new(&config).unwrap());
        (temp, config, renderer)
    }

    #[test]
    fn test_prepare_nothing() {
        let (_temp, config, renderer) = setup("");
        let coordinator = Coordinator::prepare(&config, &renderer, false, false).unwrap();
        assert!(coordinator.is_empty());
    }

    #[test]
    fn test_prepare_watch_missing_source_fails() {
        let (_temp, config, renderer) = setup("");
        std::fs::remove_dir_all(renderer.source_dir()).unwrap();
        assert!(Coordinator::prepare(&config, &renderer, true, false).is_err());
    }

    #[test]
    fn test_prepare_livereload_port_in_use_fails() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let (_temp, config, renderer) = setup(&format!("[serve]\nlivereload_port = {port}"));

        assert!(Coordinator::prepare(&config, &renderer, false, true).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_edit_is_rendered_while_watching() {
        let (_temp, config, renderer) = setup("");
        let coordinator = Coordinator::prepare(&config, &renderer, true, false).unwrap();

        let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded();
        let handle = tokio::spawn(coordinator.run(shutdown_rx));

        std::fs::write(renderer.source_dir().join("a.md"), "# Watched").unwrap();

        let output = renderer.output_dir().join("a.html");
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut html = String::new();
        while Instant::now() < deadline {
            if let Ok(content) = std::fs::read_to_string(&output)
                && content.contains("Watched")
            {
                html = content;
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(html, "<h1>Watched</h1>\n");

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_output_write_reloads_connected_browser() {
        use tungstenite::{Message, stream::MaybeTlsStream};

        let (_temp, config, renderer) = setup("[serve]\nlivereload_port = 0");
        let coordinator = Coordinator::prepare(&config, &renderer, false, true).unwrap();
        let addr = coordinator.livereload_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded();
        let handle = tokio::spawn(coordinator.run(shutdown_rx));

        let output = renderer.output_dir().join("x.html");
        let frames = tokio::task::spawn_blocking(move || {
            // A peer stuck before its upgrade request must not hold up others
            let _silent = std::net::TcpStream::connect(addr).unwrap();

            let (mut ws, _) = tungstenite::connect(format!("ws://{addr}/")).unwrap();
            if let MaybeTlsStream::Plain(stream) = ws.get_ref() {
                stream.set_read_timeout(Some(Duration::from_secs(10))).ok();
            }
            let mut next_text = move || match ws.read().unwrap() {
                Message::Text(text) => text.as_str().to_string(),
                other => panic!("unexpected frame: {other:?}"),
            };

            let connected = next_text();
            std::fs::write(&output, "<h1>X</h1>").unwrap();
            (connected, next_text())
        });
        let (connected, reload) = tokio::time::timeout(Duration::from_secs(20), frames)
            .await
            .unwrap()
            .unwrap();

        assert!(connected.contains(r#""type":"connected""#));
        assert_eq!(reload, r#"{"type":"reload","path":"/x.html"}"#);

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
