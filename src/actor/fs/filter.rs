use std::path::{Path, PathBuf};

use notify::{EventKind, event::ModifyKind};

use crate::compiler::Renderer;
use crate::utils::path::{is_temp_file, is_within};

/// Accept creates, data/name modifications and removes.
/// Metadata-only changes (mtime/atime/chmod noise) are ignored.
pub(super) fn is_relevant_kind(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(modify) => !matches!(modify, ModifyKind::Metadata(_)),
        _ => false,
    }
}

/// Kinds that can bring a whole directory of documents into the tree at once.
/// notify reports only the directory itself for these, never its contents.
fn adds_directory(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}

/// An existing, visible directory below the source root and outside the
/// output directory.
fn is_source_subdir(path: &Path, renderer: &Renderer) -> bool {
    path != renderer.source_dir()
        && path.starts_with(renderer.source_dir())
        && !is_within(path, renderer.output_dir())
        && !is_temp_file(path)
        && path.is_dir()
}

/// The path that warrants a render for this event, if any.
///
/// Normally the first document the event touches. A rename reports both
/// sides in one event; it still yields a single request. A directory
/// created or moved into place counts too, since the documents inside it
/// produce no events of their own.
pub(super) fn render_trigger(event: &notify::Event, renderer: &Renderer) -> Option<PathBuf> {
    if !is_relevant_kind(&event.kind) {
        return None;
    }
    if let Some(doc) = event.paths.iter().find(|path| renderer.is_document(path)) {
        return Some(doc.clone());
    }
    if !adds_directory(&event.kind) {
        return None;
    }
    event
        .paths
        .iter()
        .find(|path| is_source_subdir(path, renderer))
        .cloned()
}
