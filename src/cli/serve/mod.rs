//! Development server with live reload support.
//!
//! Serves the output directory over HTTP. Requests are handled one at a
//! time on the calling thread until the server is unblocked by Ctrl+C.

mod browser;
mod content;
mod listing;
mod path;
mod response;

use crate::{config::Config, core, debug, embed::serve::LIVERELOAD_JS_PATH, log};
use anyhow::{Context, Result, anyhow};
use path::Resolved;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    config: Arc<Config>,
}

/// Bind the HTTP server without starting the request loop.
///
/// A port already in use is a startup error.
pub fn bind(config: Arc<Config>) -> Result<BoundServer> {
    let addr = SocketAddr::new(config.serve.interface, config.serve.port);
    let server =
        Server::http(addr).map_err(|e| anyhow!("failed to bind HTTP server on {addr}: {e}"))?;
    let addr = server.server_addr().to_ip().unwrap_or(addr);
    let server = Arc::new(server);

    core::register_server(Arc::clone(&server));

    Ok(BoundServer {
        server,
        addr,
        config,
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking).
    pub fn run(self) {
        let url = self.config.serve.url();
        log!("serve"; "{}", url);
        debug!("serve"; "listening on {}", self.addr);
        if self.config.serve.livereload {
            debug!("serve"; "live reload on port {}", self.config.serve.livereload_port);
        }

        if self.config.serve.open
            && let Err(e) = browser::open(&url)
        {
            log!("serve"; "could not open browser: {:#}", e);
        }

        run_request_loop(&self.server, &self.config);
    }
}

fn run_request_loop(server: &Server, config: &Config) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request error: {e:#}");
        }
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &Config) -> Result<()> {
    debug!("serve"; "{} {}", request.method(), request.url());

    if core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    let livereload = config.serve.livereload;

    // Served from memory, independent of the output directory
    if livereload && request.url().split('?').next() == Some(LIVERELOAD_JS_PATH) {
        return response::respond_livereload_js(request, config.serve.livereload_port);
    }

    match path::resolve_path(request.url(), &config.source.output) {
        Resolved::File(path) => response::respond_file(request, &path, livereload),
        Resolved::Listing { dir, request_path } => {
            let html = listing::render_listing(&dir, &request_path)
                .with_context(|| format!("failed to list {}", dir.display()))?;
            response::respond_listing(request, html, livereload)
        }
        Resolved::NotFound => response::respond_not_found(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::thread;
    use tempfile::TempDir;

    struct Running {
        _temp: TempDir,
        addr: SocketAddr,
        server: Arc<Server>,
        handle: thread::JoinHandle<()>,
        output: std::path::PathBuf,
    }

    impl Running {
        fn stop(self) {
            self.server.unblock();
            self.handle.join().unwrap();
        }
    }

    fn start(toml: &str) -> Running {
        let temp = TempDir::new().unwrap();
        let mut config = crate::config::test_parse_config(toml);
        config.set_root(temp.path());
        config.serve.port = 0;
        config.serve.open = false;
        fs::create_dir_all(&config.source.output).unwrap();
        let output = config.source.output.clone();

        let bound = bind(Arc::new(config)).unwrap();
        let addr = bound.addr();
        let server = Arc::clone(&bound.server);
        let handle = thread::spawn(move || bound.run());

        Running {
            _temp: temp,
            addr,
            server,
            handle,
            output,
        }
    }

    /// Raw response split into status, header block and body.
    fn exchange(addr: SocketAddr, method: &str, path: &str) -> (u16, String, String) {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
        )
        .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).unwrap();

        let status = raw
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap();
        let (head, body) = raw.split_once("\r\n\r\n").unwrap_or((raw.as_str(), ""));
        (status, head.to_string(), body.to_string())
    }

    fn request(addr: SocketAddr, method: &str, path: &str) -> (u16, String) {
        let (status, _, body) = exchange(addr, method, path);
        (status, body)
    }

    fn content_length(head: &str) -> Option<usize> {
        head.lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse().ok())
    }

    #[test]
    fn test_get_root_serves_index_with_script() {
        let running = start("");
        fs::write(running.output.join("index.html"), "<h1>Home</h1>\n").unwrap();

        let (status, body) = request(running.addr, "GET", "/");
        assert_eq!(status, 200);
        assert!(body.starts_with("<h1>Home</h1>"));
        assert!(body.contains(LIVERELOAD_JS_PATH));

        running.stop();
    }

    #[test]
    fn test_livereload_disabled_serves_file_untouched() {
        let running = start("[serve]\nlivereload = false");
        fs::write(running.output.join("index.html"), "<h1>Home</h1>\n").unwrap();

        let (status, body) = request(running.addr, "GET", "/index.html");
        assert_eq!(status, 200);
        assert_eq!(body, "<h1>Home</h1>\n");
        assert_eq!(request(running.addr, "GET", LIVERELOAD_JS_PATH).0, 404);

        running.stop();
    }

    #[test]
    fn test_livereload_script_served_from_memory() {
        let running = start("[serve]\nlivereload_port = 40123");

        let (status, body) = request(running.addr, "GET", LIVERELOAD_JS_PATH);
        assert_eq!(status, 200);
        assert!(body.contains("40123"));

        running.stop();
    }

    #[test]
    fn test_directory_listing_and_not_found() {
        let running = start("");
        fs::create_dir_all(running.output.join("guide")).unwrap();
        fs::write(running.output.join("guide/intro.html"), "x").unwrap();

        let (status, body) = request(running.addr, "GET", "/");
        assert_eq!(status, 200);
        assert!(body.contains(r#"href="/guide/""#));

        let (status, _) = request(running.addr, "GET", "/missing.html");
        assert_eq!(status, 404);

        running.stop();
    }

    #[test]
    fn test_head_has_no_body() {
        let running = start("");
        fs::write(running.output.join("index.html"), "<h1>Home</h1>").unwrap();

        let (status, body) = request(running.addr, "HEAD", "/");
        assert_eq!(status, 200);
        assert!(body.is_empty());

        running.stop();
    }

    #[test]
    fn test_head_reports_get_length() {
        let running = start("");
        fs::write(running.output.join("index.html"), "<h1>Home</h1>").unwrap();
        fs::write(running.output.join("notes.txt"), "plain text").unwrap();

        for path in ["/", "/notes.txt"] {
            let (_, get_head, get_body) = exchange(running.addr, "GET", path);
            let (status, head_head, head_body) = exchange(running.addr, "HEAD", path);
            assert_eq!(status, 200);
            assert!(head_body.is_empty());
            assert_eq!(content_length(&get_head), Some(get_body.len()));
            assert_eq!(content_length(&head_head), Some(get_body.len()));
        }

        running.stop();
    }

    #[test]
    fn test_post_rejected() {
        let running = start("");
        assert_eq!(request(running.addr, "POST", "/").0, 405);
        running.stop();
    }

    #[test]
    fn test_bind_port_in_use_fails() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let mut config = Config::default();
        config.serve.port = port;
        let err = bind(Arc::new(config)).err().unwrap();
        assert!(err.to_string().contains("failed to bind HTTP server"));
    }
}
