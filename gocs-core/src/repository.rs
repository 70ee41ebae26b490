use crate::diff::{self, FileDiff, DEFAULT_CONTEXT};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::models::{
    hash_content, FileState, StatusEntry, TrackOutcome, TrackedEntry, UntrackOutcome,
};
use crate::paths::{self, MANIFEST_FILE, REPO_DIR, TRACK_DIR};
use crate::snapshot::SnapshotStore;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct RepositoryOptions {
    /// Context lines around each hunk of a rendered diff.
    pub diff_context: usize,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            diff_context: DEFAULT_CONTEXT,
        }
    }
}

/// A working tree with its `.gocs/` tracking root.
///
/// The manifest file stays open for the lifetime of the value. Mutations are
/// written back by [`Repository::close`], or on drop if `close` was skipped.
pub struct Repository {
    root: PathBuf,
    manifest: Manifest,
    snapshots: SnapshotStore,
    options: RepositoryOptions,
}

impl Repository {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::open_with(root, RepositoryOptions::default())
    }

    /// Opens the repository at `root`, creating `.gocs/`, `.gocs/track/` and
    /// the manifest if they do not exist. A relative `root` is resolved
    /// against the current directory.
    pub fn open_with<P: AsRef<Path>>(root: P, options: RepositoryOptions) -> Result<Self> {
        let root = root.as_ref();
        let root = std::path::absolute(root).map_err(|e| Error::access("resolve", root, e))?;
        let repo_dir = root.join(REPO_DIR);
        let track_dir = repo_dir.join(TRACK_DIR);

        ensure_dir(&repo_dir)?;
        ensure_dir(&track_dir)?;

        let manifest = Manifest::open(repo_dir.join(MANIFEST_FILE))?;
        debug!(
            "Opened repository at {:?} ({} tracked)",
            root,
            manifest.active().count()
        );

        Ok(Self {
            root,
            manifest,
            snapshots: SnapshotStore::new(track_dir),
            options,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Every manifest record in operation order, including removed ones.
    pub fn entries(&self) -> &[TrackedEntry] {
        self.manifest.entries()
    }

    pub fn tracked(&self) -> impl Iterator<Item = &str> {
        self.manifest.active().map(|e| e.path.as_str())
    }

    pub fn is_tracked(&self, path: impl AsRef<Path>) -> bool {
        paths::normalize(&self.root, path)
            .map(|p| self.manifest.is_active(&p))
            .unwrap_or(false)
    }

    /// Records the current content of `path` as its snapshot.
    ///
    /// A path seen for the first time is added. A path already tracked is
    /// updated, and the returned outcome carries the diff from the previous
    /// snapshot.
    pub fn track(&mut self, path: impl AsRef<Path>) -> Result<TrackOutcome> {
        let path = paths::normalize(&self.root, path)?;
        let working = self.root.join(&path);
        let content = fs::read(&working).map_err(|e| Error::Unreadable {
            path: working.clone(),
            source: e,
        })?;

        let diff = if self.manifest.is_active(&path) {
            let previous = match self.snapshots.get(&path)? {
                Some(bytes) => bytes,
                None => {
                    warn!("Snapshot for tracked path {} is missing", path);
                    Vec::new()
                }
            };
            Some(diff::unified(
                &previous,
                &content,
                &format!("a/{}", path),
                &format!("b/{}", path),
                self.options.diff_context,
            ))
        } else {
            None
        };

        self.snapshots.put(&path, &content)?;
        let kind = self.manifest.record_track(&path);
        info!("{} {}", kind.marker().as_str(), path);

        Ok(TrackOutcome {
            path,
            kind,
            diff,
            content_hash: hash_content(&content),
        })
    }

    /// Stops tracking `path` and deletes its snapshot.
    pub fn untrack(&mut self, path: impl AsRef<Path>) -> Result<UntrackOutcome> {
        let path = paths::normalize(&self.root, path)?;
        if !self.manifest.is_active(&path) {
            debug!("{} is not tracked", path);
            return Ok(UntrackOutcome::NotTracked);
        }

        match self.snapshots.remove(&path) {
            Ok(()) => {}
            Err(Error::Access { source, .. }) if source.kind() == IoErrorKind::NotFound => {
                warn!("Snapshot for {} was already gone", path);
            }
            Err(e) => return Err(e),
        }

        self.manifest.record_untrack(&path);
        info!("-- {}", path);
        Ok(UntrackOutcome::Removed)
    }

    /// Stored snapshot of `path`, or `None` if there is none.
    pub fn snapshot(&self, path: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
        let path = paths::normalize(&self.root, path)?;
        self.snapshots.get(&path)
    }

    /// Compares every tracked path's snapshot with the working tree.
    pub fn status(&self) -> Result<Vec<StatusEntry>> {
        self.manifest
            .active()
            .map(|entry| self.entry_status(&entry.path))
            .collect()
    }

    fn entry_status(&self, path: &str) -> Result<StatusEntry> {
        let snapshot_hash = self.snapshots.get(path)?.map(|b| hash_content(&b));
        let working_hash = self.read_working(path)?.map(|b| hash_content(&b));

        let state = match &working_hash {
            None => FileState::Missing,
            Some(hash) if Some(hash) == snapshot_hash.as_ref() => FileState::Clean,
            Some(_) => FileState::Modified,
        };

        Ok(StatusEntry {
            path: path.to_string(),
            state,
            snapshot_hash,
            working_hash,
        })
    }

    /// Diff of the stored snapshot against the working tree. `None` when the
    /// path is not tracked. A missing working file diffs as empty.
    pub fn diff(&self, path: impl AsRef<Path>) -> Result<Option<FileDiff>> {
        let path = paths::normalize(&self.root, path)?;
        if !self.manifest.is_active(&path) {
            return Ok(None);
        }

        let old = self.snapshots.get(&path)?.unwrap_or_default();
        let new = self.read_working(&path)?.unwrap_or_default();
        Ok(Some(FileDiff::from_contents(&path, &old, &new)))
    }

    fn read_working(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let working = self.root.join(path);
        match fs::read(&working) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::access("read", working, e)),
        }
    }

    /// Writes the manifest to disk without closing the repository.
    pub fn flush(&mut self) -> Result<()> {
        self.manifest.flush()
    }

    /// Flushes the manifest and releases the repository.
    pub fn close(mut self) -> Result<()> {
        self.manifest.flush()
    }
}

impl Drop for Repository {
    fn drop(&mut self) {
        if !self.manifest.is_dirty() {
            return;
        }
        warn!(
            "Repository at {:?} dropped without close, flushing manifest",
            self.root
        );
        if let Err(e) = self.manifest.flush() {
            warn!("Failed to flush manifest: {}", e);
        }
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}
