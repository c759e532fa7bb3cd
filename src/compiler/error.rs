//! Render error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure while enumerating, reading, converting or writing a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document content cannot be rendered (e.g. not valid UTF-8).
    #[error("`{}`: {reason}", path.display())]
    Input { path: PathBuf, reason: String },

    /// Filesystem failure: walk, read, create-dir or write.
    #[error("failed to {op} `{}`: {err}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        err: std::io::Error,
    },
}

impl RenderError {
    pub(crate) fn io(op: &'static str, path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_display() {
        let err = RenderError::io(
            "write",
            Path::new("out/a.html"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(err.to_string(), "failed to write `out/a.html`: permission denied");
        assert!(matches!(err, RenderError::Io { op: "write", .. }));
    }

    #[test]
    fn test_input_display() {
        let err = RenderError::Input {
            path: PathBuf::from("a.md"),
            reason: "invalid utf-8".into(),
        };
        assert_eq!(err.to_string(), "`a.md`: invalid utf-8");
    }
}
