use gocs_core::{Marker, Repository, TrackKind, UntrackOutcome};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

#[test]
fn test_project_walkthrough() {
    let temp_dir = TempDir::new().unwrap();
    let proj = temp_dir.path().join("proj");
    fs::create_dir(&proj).unwrap();

    let mut repo = Repository::open(&proj).unwrap();
    assert!(proj.join(".gocs/conf").is_file());
    assert!(proj.join(".gocs/track").is_dir());

    write(&proj, "a/b.txt", "hello");
    let outcome = repo.track("a/b.txt").unwrap();
    assert_eq!(outcome.kind, TrackKind::Added);
    assert_eq!(
        fs::read_to_string(proj.join(".gocs/track/a/b.txt")).unwrap(),
        "hello"
    );

    write(&proj, "a/b.txt", "hello world");
    let outcome = repo.track("a/b.txt").unwrap();
    assert_eq!(outcome.kind, TrackKind::Updated);
    assert!(!outcome.diff.unwrap().is_empty());
    assert_eq!(
        fs::read_to_string(proj.join(".gocs/track/a/b.txt")).unwrap(),
        "hello world"
    );

    assert_eq!(repo.untrack("a/b.txt").unwrap(), UntrackOutcome::Removed);
    assert!(!proj.join(".gocs/track/a/b.txt").exists());
    assert!(repo.snapshot("a/b.txt").unwrap().is_none());

    assert_eq!(repo.untrack("a/b.txt").unwrap(), UntrackOutcome::NotTracked);

    repo.close().unwrap();
}

#[test]
fn test_track_is_visible_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let mut repo = Repository::open(root).unwrap();
    write(root, "docs/guide.md", "# Guide\n");
    repo.track("docs/guide.md").unwrap();
    repo.close().unwrap();

    let repo = Repository::open(root).unwrap();
    let active: Vec<_> = repo.tracked().collect();
    assert_eq!(active, vec!["docs/guide.md"]);
}

#[test]
fn test_close_and_reopen_reconstructs_active_set() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let mut repo = Repository::open(root).unwrap();
    for (path, content) in [
        ("one.txt", "1"),
        ("two/two.txt", "2"),
        ("three/3/three.txt", "3"),
    ] {
        write(root, path, content);
        repo.track(path).unwrap();
    }
    repo.untrack("two/two.txt").unwrap();
    write(root, "one.txt", "1 again");
    repo.track("one.txt").unwrap();
    repo.untrack("three/3/three.txt").unwrap();
    repo.track("three/3/three.txt").unwrap();
    repo.close().unwrap();

    let repo = Repository::open(root).unwrap();
    let active: BTreeSet<_> = repo.tracked().map(str::to_string).collect();
    let expected: BTreeSet<_> = ["one.txt", "three/3/three.txt"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(active, expected);

    let markers: Vec<_> = repo
        .entries()
        .iter()
        .map(|e| (e.path.as_str(), e.marker))
        .collect();
    assert_eq!(
        markers,
        vec![
            ("one.txt", Marker::Updated),
            ("two/two.txt", Marker::Removed),
            ("three/3/three.txt", Marker::Removed),
            ("three/3/three.txt", Marker::Added),
        ]
    );
}

#[test]
fn test_manifest_file_layout() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let mut repo = Repository::open(root).unwrap();
    write(root, "a.txt", "a");
    write(root, "b.txt", "b");
    repo.track("a.txt").unwrap();
    repo.track("./b.txt").unwrap();
    repo.track("a.txt").unwrap();
    repo.untrack("b.txt").unwrap();
    repo.close().unwrap();

    assert_eq!(
        fs::read_to_string(root.join(".gocs/conf")).unwrap(),
        "gocs 1.0.0 2\n--/++:a.txt\n--:b.txt\n"
    );
}

#[test]
fn test_interrupted_write_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join(".gocs/track")).unwrap();
    fs::write(root.join(".gocs/conf"), "gocs 1.0.0 1\n++:kept.txt\n++:parti").unwrap();

    let repo = Repository::open(root).unwrap();
    let active: Vec<_> = repo.tracked().collect();
    assert_eq!(active, vec!["kept.txt"]);
}

#[test]
fn test_existing_empty_manifest_fails_open() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join(".gocs/track")).unwrap();
    fs::write(root.join(".gocs/conf"), "").unwrap();

    let err = Repository::open(root).err().unwrap();
    assert_eq!(err.kind(), gocs_core::ErrorKind::Fatal);
}

#[test]
fn test_manifest_paths_outside_root_fail_open() {
    for record in ["++:../secret.txt", "++:/etc/hostname"] {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".gocs/track")).unwrap();
        fs::write(
            root.join(".gocs/conf"),
            format!("gocs 1.0.0 1\n{}\n", record),
        )
        .unwrap();

        let err = Repository::open(root).err().unwrap();
        assert!(matches!(err, gocs_core::Error::CorruptManifest { .. }));
        assert_eq!(err.kind(), gocs_core::ErrorKind::Fatal);
    }
}
