//! Response builders for the dev server.
//!
//! Every handler builds a [`Reply`] and hands it to [`Reply::send`], which
//! withholds the body for `HEAD` and stamps `Cache-Control: no-store` so the
//! browser always refetches after a reload.

use super::content::maybe_inject_livereload;
use crate::utils::mime::{
    self,
    types::{HTML, JAVASCRIPT, PLAIN},
};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::{self, Cursor},
    path::Path,
};
use tiny_http::{Header, Method, Request, Response, StatusCode};

struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    allow: Option<&'static str>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            allow: None,
        }
    }

    /// `HEAD` gets the `Content-Length` of the matching `GET`, without the body.
    fn send(self, request: Request) -> Result<()> {
        let mut headers = vec![
            header("Content-Type", self.content_type)?,
            header("Cache-Control", "no-store")?,
        ];
        if let Some(methods) = self.allow {
            headers.push(header("Allow", methods)?);
        }

        let status = StatusCode(self.status);
        let len = self.body.len();
        let sent = if request.method() == &Method::Head {
            request.respond(Response::new(status, headers, io::empty(), Some(len), None))
        } else {
            let body = Cursor::new(self.body);
            request.respond(Response::new(status, headers, body, Some(len), None))
        };
        sent.context("Failed to write response")
    }
}

fn header(name: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|()| anyhow!("invalid header `{name}: {value}`"))
}

/// A file from the output directory. HTML pages get the reload script.
pub fn respond_file(request: Request, path: &Path, livereload: bool) -> Result<()> {
    let content_type = mime::from_path(path);
    // Read for HEAD too: the reported length includes the injected script.
    let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let body = maybe_inject_livereload(raw, content_type, livereload);
    Reply::new(200, content_type, body).send(request)
}

/// A generated directory listing page.
pub fn respond_listing(request: Request, html: String, livereload: bool) -> Result<()> {
    let body = maybe_inject_livereload(html.into_bytes(), HTML, livereload);
    Reply::new(200, HTML, body).send(request)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    Reply::new(404, PLAIN, "404 Not Found").send(request)
}

/// Anything but `GET` and `HEAD`.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let mut reply = Reply::new(405, PLAIN, "405 Method Not Allowed");
    reply.allow = Some("GET, HEAD");
    reply.send(request)
}

/// Sent while Ctrl+C shutdown is in progress.
pub fn respond_unavailable(request: Request) -> Result<()> {
    Reply::new(503, PLAIN, "503 Service Unavailable").send(request)
}

/// The reload client script, with the WebSocket port filled in.
pub fn respond_livereload_js(request: Request, ws_port: u16) -> Result<()> {
    use crate::embed::serve::{LIVERELOAD_JS, LivereloadVars};

    let script = LIVERELOAD_JS.render(&LivereloadVars { ws_port });
    Reply::new(200, JAVASCRIPT, script).send(request)
}
