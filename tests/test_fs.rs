use restitch::fs::{atomic_write_text, resolve_in_root, restore_snapshot, snapshot_file};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_atomic_write_creates_parent_directories() {
    let temp = tempdir().unwrap();
    let target = temp.path().join("deep/nested/file.txt");

    atomic_write_text(&target, "content").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "content");
}

#[test]
fn test_atomic_write_replaces_existing_content() {
    let temp = tempdir().unwrap();
    let target = temp.path().join("file.txt");
    fs::write(&target, "old").unwrap();

    atomic_write_text(&target, "new").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "new");
}

#[test]
fn test_resolve_in_root_accepts_plain_relative_paths() {
    let root = Path::new("/project");
    assert_eq!(
        resolve_in_root(root, "src/main.rs"),
        Some(root.join("src/main.rs"))
    );
}

#[test]
fn test_resolve_in_root_normalizes_internal_traversals() {
    let root = Path::new("/project");
    assert_eq!(
        resolve_in_root(root, "src/../docs/./readme.md"),
        Some(root.join("docs/readme.md"))
    );
}

#[test]
fn test_resolve_in_root_rejects_escaping_traversals() {
    let root = Path::new("/project");
    assert_eq!(resolve_in_root(root, "../secret.txt"), None);
    assert_eq!(resolve_in_root(root, "a/../../secret.txt"), None);
}

#[test]
fn test_resolve_in_root_rejects_absolute_paths() {
    let root = Path::new("/project");
    assert_eq!(resolve_in_root(root, "/etc/passwd"), None);
}

#[test]
fn test_resolve_in_root_rejects_empty_results() {
    let root = Path::new("/project");
    assert_eq!(resolve_in_root(root, "."), None);
    assert_eq!(resolve_in_root(root, "a/.."), None);
}

#[test]
fn test_snapshot_records_content_and_existence() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("present.txt");
    fs::write(&path, "hello").unwrap();

    let snapshot = snapshot_file(&path, "present.txt").unwrap();
    assert!(snapshot.existed);
    assert_eq!(snapshot.content.as_deref(), Some("hello"));

    let missing = snapshot_file(&temp.path().join("absent.txt"), "absent.txt").unwrap();
    assert!(!missing.existed);
    assert_eq!(missing.content, None);
}

#[test]
fn test_restore_snapshot_round_trip() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    let path = root.join("file.txt");
    fs::write(&path, "original").unwrap();

    // GIVEN a snapshot taken before an edit
    let snapshot = snapshot_file(&path, "file.txt").unwrap();
    fs::write(&path, "mangled").unwrap();

    // WHEN restoring
    restore_snapshot(root, &snapshot).unwrap();

    // THEN the original content is back
    assert_eq!(fs::read_to_string(&path).unwrap(), "original");
}

#[test]
fn test_restore_snapshot_removes_files_that_did_not_exist() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    let path = root.join("created.txt");

    let snapshot = snapshot_file(&path, "created.txt").unwrap();
    fs::write(&path, "new file").unwrap();

    restore_snapshot(root, &snapshot).unwrap();
    assert!(!path.exists());
}
