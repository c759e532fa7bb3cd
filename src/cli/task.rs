//! Task registry and dispatch.
//!
//! Each task is an explicit list of components:
//!
//! | task      | components            |
//! |-----------|-----------------------|
//! | md        | render                |
//! | watch     | watch                 |
//! | webserver | serve                 |
//! | default   | watch, render, serve  |
//!
//! Components start in table order: the source watch is registered before
//! the initial render, so edits made during that pass still trigger a new one.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{Context, Result, bail};

use super::Commands;
use crate::actor::Coordinator;
use crate::compiler::Renderer;
use crate::config::Config;
use crate::{core, log};

/// A unit of work a task is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// One full render pass
    Render,
    /// Source watch with a render per change
    Watch,
    /// HTTP server with live reload
    Serve,
}

/// A named task from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Md,
    Watch,
    Webserver,
    Default,
}

impl Task {
    pub const fn components(self) -> &'static [Component] {
        match self {
            Self::Md => &[Component::Render],
            Self::Watch => &[Component::Watch],
            Self::Webserver => &[Component::Serve],
            Self::Default => &[Component::Watch, Component::Render, Component::Serve],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Md => "md",
            Self::Watch => "watch",
            Self::Webserver => "webserver",
            Self::Default => "default",
        }
    }

    fn has(self, component: Component) -> bool {
        self.components().contains(&component)
    }
}

impl From<Option<Commands>> for Task {
    fn from(command: Option<Commands>) -> Self {
        match command {
            Some(Commands::Md) => Self::Md,
            Some(Commands::Watch) => Self::Watch,
            Some(Commands::Webserver) => Self::Webserver,
            Some(Commands::Default) | None => Self::Default,
        }
    }
}

/// Run a task to completion. Long-running tasks return after Ctrl+C.
pub fn run(task: Task, config: Arc<Config>) -> Result<()> {
    crate::debug!("task"; "{} -> {:?}", task.name(), task.components());
    let renderer = Arc::new(Renderer::new(&config)?);

    let watch = task.has(Component::Watch);
    let serve = task.has(Component::Serve);

    if !watch && !serve {
        return render_once(&renderer, &config);
    }

    let coordinator =
        Coordinator::prepare(&config, &renderer, watch, serve && config.serve.livereload)?;

    if task.has(Component::Render)
        && let Err(e) = render_once(&renderer, &config)
    {
        log!("error"; "{:#}", e);
    }

    let server = if serve {
        Some(super::serve::bind(Arc::clone(&config))?)
    } else {
        None
    };

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded::<()>();
    core::register_shutdown(shutdown_tx);

    let actors = if coordinator.is_empty() {
        None
    } else {
        Some(spawn_actors(coordinator, shutdown_rx)?)
    };

    match server {
        Some(server) => {
            server.run();
            wait_for_shutdown(actors);
        }
        None => {
            log!("watch"; "watching {}", config.root_relative(renderer.source_dir()).display());
            if let Some(handle) = actors {
                let _ = handle.join();
            }
        }
    }

    Ok(())
}

/// Run one render pass and log its outcome. Any failed document is an error.
fn render_once(renderer: &Renderer, config: &Config) -> Result<()> {
    let start = Instant::now();
    let report = renderer.render_all().context("render failed")?;

    for failure in &report.failures {
        log!("error"; "{}", failure);
    }
    if !report.is_success() {
        bail!("{}", report.summary());
    }

    log!("render"; "{} into {} in {:?}",
        report.summary(),
        config.root_relative(renderer.output_dir()).display(),
        start.elapsed()
    );
    Ok(())
}

fn spawn_actors(
    coordinator: Coordinator,
    shutdown_rx: crossbeam::channel::Receiver<()>,
) -> Result<JoinHandle<()>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    Ok(thread::spawn(move || {
        rt.block_on(coordinator.run(shutdown_rx));
    }))
}

/// Wait for the actor system to stop (max 2 seconds).
fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(std::time::Duration::from_millis(50));
    }
}
