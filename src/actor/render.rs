//! Render Actor - sequential full render passes
//!
//! Each `Render` message runs one full pass on the blocking pool. The actor
//! awaits a pass before taking the next message, so passes never overlap and
//! a slow pass never stalls the watcher or the server.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::messages::RenderMsg;
use crate::compiler::{RenderError, RenderReport, Renderer};
use crate::logger::{status_error, status_success};

pub struct RenderActor {
    rx: mpsc::Receiver<RenderMsg>,
    renderer: Arc<Renderer>,
}

impl RenderActor {
    pub fn new(rx: mpsc::Receiver<RenderMsg>, renderer: Arc<Renderer>) -> Self {
        Self { rx, renderer }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                RenderMsg::Render { trigger } => self.on_render(trigger).await,
                RenderMsg::Shutdown => {
                    crate::debug!("render"; "shutting down");
                    break;
                }
            }
        }
    }

    async fn on_render(&self, trigger: Option<PathBuf>) {
        let renderer = Arc::clone(&self.renderer);
        let start = Instant::now();

        match tokio::task::spawn_blocking(move || renderer.render_all()).await {
            Ok(result) => {
                let label = trigger.as_deref().map(|p| self.display(p));
                report_pass(&result, label.as_deref(), start.elapsed());
            }
            Err(e) => crate::log!("error"; "render task failed: {}", e),
        }
    }

    fn display(&self, path: &Path) -> String {
        path.strip_prefix(self.renderer.source_dir())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Show the outcome of a pass on the watch status line.
fn report_pass(result: &Result<RenderReport, RenderError>, trigger: Option<&str>, elapsed: Duration) {
    let prefix = trigger.map(|t| format!("{t}: ")).unwrap_or_default();
    match result {
        Ok(report) if report.is_success() => {
            status_success(&format!("{prefix}{} in {:?}", report.summary(), elapsed));
        }
        Ok(report) => status_error(&format!("{prefix}{}", report.summary()), &report.failure_detail()),
        Err(e) => status_error(&format!("{prefix}render failed"), &e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<Renderer>) {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set_root(temp.path());
        fs::create_dir_all(&config.source.dir).unwrap();
        (temp, Arc::new(Renderer::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_render_request_runs_pass() {
        let (_temp, renderer) = setup();
        fs::write(renderer.source_dir().join("a.md"), "# A").unwrap();

        let (tx, rx) = mpsc::channel(8);
        let actor = RenderActor::new(rx, Arc::clone(&renderer));
        tx.send(RenderMsg::Render { trigger: None }).await.unwrap();
        tx.send(RenderMsg::Shutdown).await.unwrap();
        actor.run().await;

        let html = fs::read_to_string(renderer.output_dir().join("a.html")).unwrap();
        assert_eq!(html, "<h1>A</h1>\n");
    }

    #[tokio::test]
    async fn test_every_request_renders_in_order() {
        let (_temp, renderer) = setup();
        let doc = renderer.source_dir().join("a.md");
        fs::write(&doc, "# First").unwrap();

        let (tx, rx) = mpsc::channel(8);
        let actor = RenderActor::new(rx, Arc::clone(&renderer));
        let handle = tokio::spawn(actor.run());

        tx.send(RenderMsg::Render { trigger: Some(doc.clone()) }).await.unwrap();
        tx.send(RenderMsg::Shutdown).await.unwrap();
        handle.await.unwrap();
        assert!(fs::read_to_string(renderer.output_dir().join("a.html")).unwrap().contains("First"));

        fs::write(&doc, "# Second").unwrap();
        let (tx, rx) = mpsc::channel(8);
        let actor = RenderActor::new(rx, Arc::clone(&renderer));
        tx.send(RenderMsg::Render { trigger: Some(doc) }).await.unwrap();
        drop(tx);
        actor.run().await;
        assert!(fs::read_to_string(renderer.output_dir().join("a.html")).unwrap().contains("Second"));
    }

    #[tokio::test]
    async fn test_failed_document_keeps_actor_alive() {
        let (_temp, renderer) = setup();
        fs::write(renderer.source_dir().join("bad.md"), [0xff, 0xfe]).unwrap();
        fs::write(renderer.source_dir().join("good.md"), "ok").unwrap();

        let (tx, rx) = mpsc::channel(8);
        let actor = RenderActor::new(rx, Arc::clone(&renderer));
        tx.send(RenderMsg::Render { trigger: None }).await.unwrap();
        tx.send(RenderMsg::Render { trigger: None }).await.unwrap();
        drop(tx);
        actor.run().await;

        assert!(renderer.output_dir().join("good.html").exists());
        assert!(!renderer.output_dir().join("bad.html").exists());
    }

    #[test]
    fn test_display_relative_to_source() {
        let (_temp, renderer) = setup();
        let (_tx, rx) = mpsc::channel(1);
        let actor = RenderActor::new(rx, Arc::clone(&renderer));
        let shown = actor.display(&renderer.source_dir().join("guide").join("a.md"));
        assert_eq!(PathBuf::from(shown), Path::new("guide").join("a.md"));
    }
}
