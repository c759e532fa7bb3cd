use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use super::FsActor;
use super::filter::{is_relevant_kind, render_trigger};
use crate::actor::messages::RenderMsg;
use crate::compiler::Renderer;
use crate::config::Config;
use crate::utils::path::normalize_path;

fn make_renderer() -> (TempDir, Renderer) {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path());

    let mut config = Config::default();
    config.set_root(&root);
    fs::create_dir_all(&config.source.dir).unwrap();

    let renderer = Renderer::new(&config).unwrap();
    (temp, renderer)
}

fn make_event(paths: Vec<PathBuf>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths,
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn metadata_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn rename_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Name(
        notify::event::RenameMode::Both,
    ))
}

#[test]
fn test_relevant_kinds() {
    assert!(is_relevant_kind(&create_kind()));
    assert!(is_relevant_kind(&modify_kind()));
    assert!(is_relevant_kind(&remove_kind()));
    assert!(is_relevant_kind(&rename_kind()));
    assert!(!is_relevant_kind(&metadata_kind()));
    assert!(!is_relevant_kind(&notify::EventKind::Access(
        notify::event::AccessKind::Any
    )));
}

#[test]
fn test_document_change_triggers() {
    let (_temp, renderer) = make_renderer();
    let doc = renderer.source_dir().join("a.md");

    let event = make_event(vec![doc.clone()], modify_kind());
    assert_eq!(render_trigger(&event, &renderer), Some(doc));
}

#[test]
fn test_removed_document_triggers() {
    let (_temp, renderer) = make_renderer();
    let doc = renderer.source_dir().join("guide/old.md");

    let event = make_event(vec![doc.clone()], remove_kind());
    assert_eq!(render_trigger(&event, &renderer), Some(doc));
}

#[test]
fn test_metadata_change_ignored() {
    let (_temp, renderer) = make_renderer();
    let event = make_event(vec![renderer.source_dir().join("a.md")], metadata_kind());
    assert_eq!(render_trigger(&event, &renderer), None);
}

#[test]
fn test_non_document_ignored() {
    let (_temp, renderer) = make_renderer();
    let src = renderer.source_dir();
    for path in [src.join("notes.txt"), src.join(".a.md.swp"), src.join("a.md~")] {
        let event = make_event(vec![path], modify_kind());
        assert_eq!(render_trigger(&event, &renderer), None);
    }
}

#[test]
fn test_output_dir_ignored() {
    let (_temp, renderer) = make_renderer();
    let event = make_event(vec![renderer.output_dir().join("a.md")], create_kind());
    assert_eq!(render_trigger(&event, &renderer), None);
}

#[test]
fn test_rename_yields_single_trigger() {
    let (_temp, renderer) = make_renderer();
    let from = renderer.source_dir().join("draft.txt");
    let to = renderer.source_dir().join("post.md");

    let event = make_event(vec![from, to.clone()], rename_kind());
    assert_eq!(render_trigger(&event, &renderer), Some(to));
}

#[test]
fn test_watch_missing_source_dir_fails() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.set_root(temp.path());
    let renderer = Arc::new(Renderer::new(&config).unwrap());

    let (tx, _rx) = mpsc::channel(8);
    assert!(FsActor::new(renderer, tx).is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_edit_sends_render_request() {
    let (_temp, renderer) = make_renderer();
    let renderer = Arc::new(renderer);
    let doc = renderer.source_dir().join("a.md");

    let (tx, mut rx) = mpsc::channel(8);
    let actor = FsActor::new(Arc::clone(&renderer), tx).unwrap();
    let handle = tokio::spawn(actor.run());

    fs::write(&doc, "# Edited").unwrap();

    let msg = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("no render request within timeout")
        .unwrap();
    assert!(matches!(msg, RenderMsg::Render { trigger: Some(path) } if path.ends_with("a.md")));

    handle.abort();
}

#[test]
fn test_directory_moved_in_triggers() {
    let (_temp, renderer) = make_renderer();
    let from = renderer.source_dir().join("guide");
    let to = renderer.source_dir().join("guide2");
    fs::create_dir_all(&to).unwrap();

    let event = make_event(vec![from, to.clone()], rename_kind());
    assert_eq!(render_trigger(&event, &renderer), Some(to.clone()));

    let event = make_event(vec![to.clone()], create_kind());
    assert_eq!(render_trigger(&event, &renderer), Some(to));
}

#[test]
fn test_directory_events_outside_tree_ignored() {
    let (_temp, renderer) = make_renderer();
    let out_sub = renderer.output_dir().join("guide");
    let hidden = renderer.source_dir().join(".git");
    let gone = renderer.source_dir().join("old");
    fs::create_dir_all(&out_sub).unwrap();
    fs::create_dir_all(&hidden).unwrap();

    for path in [out_sub, hidden, gone, renderer.output_dir().to_path_buf()] {
        let event = make_event(vec![path], create_kind());
        assert_eq!(render_trigger(&event, &renderer), None);
    }
}

#[test]
fn test_directory_modify_or_remove_ignored() {
    let (_temp, renderer) = make_renderer();
    let dir = renderer.source_dir().join("guide");
    fs::create_dir_all(&dir).unwrap();

    assert_eq!(render_trigger(&make_event(vec![dir.clone()], modify_kind()), &renderer), None);
    assert_eq!(render_trigger(&make_event(vec![dir], remove_kind()), &renderer), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_directory_rename_sends_render_request() {
    let (_temp, renderer) = make_renderer();
    let renderer = Arc::new(renderer);
    let guide = renderer.source_dir().join("guide");
    fs::create_dir_all(&guide).unwrap();
    fs::write(guide.join("a.md"), "# A").unwrap();

    let (tx, mut rx) = mpsc::channel(8);
    let actor = FsActor::new(Arc::clone(&renderer), tx).unwrap();
    let handle = tokio::spawn(actor.run());

    fs::rename(&guide, renderer.source_dir().join("guide2")).unwrap();

    let msg = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("no render request within timeout")
        .unwrap();
    assert!(matches!(msg, RenderMsg::Render { trigger: Some(path) } if path.ends_with("guide2")));

    handle.abort();
}
