//! Markdown tree rendering.
//!
//! A render pass enumerates every document under the source root, converts
//! each one to HTML and writes it to the mirrored location in the output
//! directory. There is no caching: every pass rewrites every document.

mod error;
pub mod markdown;

pub use error::RenderError;
pub use markdown::render_markdown;

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use jwalk::WalkDir;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::config::{Config, MarkdownConfig};
use crate::utils::{
    path::{is_temp_file, is_within},
    plural::plural_count,
};

/// `*` and `?` never cross a `/`, so `*.md` only matches top-level documents.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A document found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDoc {
    /// Absolute path of the Markdown file.
    pub path: PathBuf,
    /// Path relative to the source root.
    pub rel: PathBuf,
}

/// Outcome of a full render pass.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Output files written, in source order.
    pub rendered: Vec<PathBuf>,
    /// Documents that failed; the pass continued past each of them.
    pub failures: Vec<RenderError>,
}

impl RenderReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary: `rendered 3 documents` or
    /// `rendered 2 documents, 1 failed`.
    pub fn summary(&self) -> String {
        let rendered = plural_count(self.rendered.len(), "document");
        if self.failures.is_empty() {
            format!("rendered {rendered}")
        } else {
            format!("rendered {rendered}, {} failed", self.failures.len())
        }
    }

    /// Failure lines, one per document.
    pub fn failure_detail(&self) -> String {
        self.failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders the configured source tree into the output directory.
#[derive(Debug, Clone)]
pub struct Renderer {
    source_dir: PathBuf,
    output_dir: PathBuf,
    pattern: Pattern,
    options: MarkdownConfig,
}

impl Renderer {
    pub fn new(config: &Config) -> Result<Self> {
        let pattern = Pattern::new(&config.source.pattern)
            .with_context(|| format!("invalid document glob `{}`", config.source.pattern))?;
        Ok(Self {
            source_dir: config.source.dir.clone(),
            output_dir: config.source.output.clone(),
            pattern,
            options: config.markdown,
        })
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Check whether a relative path matches the document glob.
    fn matches_rel(&self, rel: &Path) -> bool {
        self.pattern.matches_path_with(rel, MATCH_OPTIONS)
    }

    /// Check whether an absolute path names a document of this tree.
    ///
    /// False for anything inside the output directory, outside the source
    /// root, or an editor temp file.
    pub fn is_document(&self, path: &Path) -> bool {
        if is_within(path, &self.output_dir) || is_temp_file(path) {
            return false;
        }
        path.strip_prefix(&self.source_dir)
            .is_ok_and(|rel| self.matches_rel(rel))
    }

    /// Enumerate every document under the source root, sorted by relative path.
    pub fn collect_sources(&self) -> Result<Vec<SourceDoc>, RenderError> {
        if !self.source_dir.is_dir() {
            return Err(RenderError::io(
                "read directory",
                &self.source_dir,
                io::Error::new(io::ErrorKind::NotFound, "source directory not found"),
            ));
        }

        let mut docs = Vec::new();
        for entry in WalkDir::new(&self.source_dir).sort(true) {
            let entry = entry
                .map_err(|e| RenderError::io("walk", &self.source_dir, io::Error::other(e.to_string())))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.starts_with(&self.output_dir) {
                continue;
            }
            let Ok(rel) = path.strip_prefix(&self.source_dir) else {
                continue;
            };
            if self.matches_rel(rel) {
                docs.push(SourceDoc {
                    rel: rel.to_path_buf(),
                    path,
                });
            }
        }

        docs.sort_by(|a, b| a.rel.cmp(&b.rel));
        Ok(docs)
    }

    /// Output location for a source-relative path: `a/b.md` → `<output>/a/b.html`.
    pub fn output_path(&self, rel: &Path) -> PathBuf {
        self.output_dir.join(rel.with_extension("html"))
    }

    /// Render one document, overwriting its output. Returns the output path.
    pub fn render_document(&self, doc: &SourceDoc) -> Result<PathBuf, RenderError> {
        let bytes = fs::read(&doc.path).map_err(|e| RenderError::io("read", &doc.path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| RenderError::Input {
            path: doc.path.clone(),
            reason: format!("not valid UTF-8: {}", e.utf8_error()),
        })?;

        let html = render_markdown(&text, &self.options);

        let out = self.output_path(&doc.rel);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| RenderError::io("create directory", parent, e))?;
        }
        fs::write(&out, html).map_err(|e| RenderError::io("write", &out, e))?;
        Ok(out)
    }

    /// Render every document. Only a failure to enumerate the tree is an
    /// `Err`; per-document failures are collected in the report.
    pub fn render_all(&self) -> Result<RenderReport, RenderError> {
        let docs = self.collect_sources()?;
        let mut report = RenderReport::default();

        for doc in &docs {
            match self.render_document(doc) {
                Ok(out) => report.rendered.push(out),
                Err(e) => report.failures.push(e),
            }
        }

        Ok(report)
    }
}
