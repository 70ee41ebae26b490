use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory tree under `.gocs/track/` holding the latest content of every
/// tracked file, laid out at the same relative path as in the working tree.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the snapshot for a normalized manifest path.
    pub fn snapshot_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    /// Stores `bytes` as the snapshot of `path`, replacing any previous
    /// content. Missing parent directories are created.
    pub fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.snapshot_path(path);

        if let Some(parent) = target.parent() {
            if !parent.is_dir() {
                fs::create_dir_all(parent).map_err(|e| Error::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        fs::write(&target, bytes).map_err(|e| Error::SnapshotWrite {
            path: target.clone(),
            source: e,
        })?;

        debug!("Wrote {} bytes to snapshot {:?}", bytes.len(), target);
        Ok(())
    }

    /// Reads the stored snapshot. `Ok(None)` when there is none.
    pub fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let target = self.snapshot_path(path);
        match fs::read(&target) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::access("read snapshot", target, e)),
        }
    }

    /// Deletes the stored snapshot and any directories left empty by it.
    pub fn remove(&self, path: &str) -> Result<()> {
        let target = self.snapshot_path(path);
        fs::remove_file(&target).map_err(|e| Error::access("remove snapshot", &target, e))?;
        self.prune_empty_parents(&target);
        debug!("Removed snapshot {:?}", target);
        Ok(())
    }

    fn prune_empty_parents(&self, target: &Path) {
        let mut dir = target.parent();
        while let Some(current) = dir {
            if current == self.root {
                break;
            }
            if let Err(e) = fs::remove_dir(current) {
                debug!("Keeping snapshot directory {:?}: {}", current, e);
                break;
            }
            dir = current.parent();
        }
    }
}
