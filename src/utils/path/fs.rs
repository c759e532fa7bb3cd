//! Filesystem path checks shared by the renderer and the watchers.

use std::path::{Path, PathBuf};

/// Absolute form of `path`.
///
/// Existing paths are canonicalized. Paths that do not exist yet (an
/// output directory before the first pass) are made absolute against the
/// current directory instead.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match std::env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    }
}

/// `path` equals `dir` or lies below it.
///
/// Falls back to comparing canonical forms, since notify may report
/// `/private/var/...` for a watch registered on `/var/...`.
pub fn is_within(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir) || normalize_path(path).starts_with(normalize_path(dir))
}

/// Editor swap, backup and hidden files, which never count as documents.
pub fn is_temp_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') || name.ends_with('~') {
        return true;
    }
    let ext = path.extension().and_then(|e| e.to_str());
    matches!(ext, Some("swp" | "swo" | "swx" | "bak" | "tmp"))
}
