use crate::codec;
use crate::error::{Error, Result};
use crate::models::{Marker, TrackKind, TrackedEntry};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind as IoErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Ordered record of every tracked path plus the open manifest file.
///
/// The in-memory entries are authoritative between `open` and `flush`; the
/// file on disk is stale until flushed.
#[derive(Debug)]
pub struct Manifest {
    file: File,
    path: PathBuf,
    entries: Vec<TrackedEntry>,
    dirty: bool,
}

impl Manifest {
    /// Opens the manifest at `path`, creating it with an empty record set if
    /// it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(file) => Self::load(file, path),
            Err(e) if e.kind() == IoErrorKind::NotFound => Self::create(path),
            Err(e) => Err(Error::access("open", path, e)),
        }
    }

    fn create(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::access("create", &path, e))?;

        let mut manifest = Self {
            file,
            path,
            entries: Vec::new(),
            dirty: true,
        };
        manifest.flush()?;
        debug!("Created manifest {:?}", manifest.path);
        Ok(manifest)
    }

    fn load(mut file: File, path: PathBuf) -> Result<Self> {
        let len = file
            .seek(SeekFrom::End(0))
            .map_err(|e| Error::access("seek", &path, e))?;
        if len == 0 {
            return Err(Error::EmptyManifest(path));
        }

        file.seek(SeekFrom::Start(0))
            .map_err(|e| Error::access("seek", &path, e))?;
        let mut bytes = Vec::with_capacity(len as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::access("read", &path, e))?;

        let decoded = codec::decode(&bytes, &path)?;
        if decoded.trailing > 0 {
            warn!(
                "Ignoring {} trailing bytes in manifest {:?}",
                decoded.trailing, path
            );
        }

        let mut active = HashSet::new();
        for entry in decoded.entries.iter().filter(|e| e.is_active()) {
            if !active.insert(entry.path.as_str()) {
                return Err(Error::corrupt(
                    &path,
                    format!("{} is tracked more than once", entry.path),
                ));
            }
        }

        debug!(
            "Loaded manifest {:?} with {} records",
            path,
            decoded.entries.len()
        );

        Ok(Self {
            file,
            path,
            entries: decoded.entries,
            dirty: false,
        })
    }

    pub fn entries(&self) -> &[TrackedEntry] {
        &self.entries
    }

    pub fn active(&self) -> impl Iterator<Item = &TrackedEntry> {
        self.entries.iter().filter(|e| e.is_active())
    }

    pub fn is_active(&self, path: &str) -> bool {
        self.find_active(path).is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn find_active(&self, path: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.is_active() && e.path == path)
    }

    /// Records a `track` of `path`: rewrites an Active slot as updated, or
    /// appends a new Added slot.
    pub fn record_track(&mut self, path: &str) -> TrackKind {
        self.dirty = true;
        match self.find_active(path) {
            Some(index) => {
                self.entries[index].marker = Marker::Updated;
                TrackKind::Updated
            }
            None => {
                self.entries.push(TrackedEntry::new(path, Marker::Added));
                TrackKind::Added
            }
        }
    }

    /// Marks the Active slot for `path` as removed. Returns `false` when no
    /// Active slot exists.
    pub fn record_untrack(&mut self, path: &str) -> bool {
        match self.find_active(path) {
            Some(index) => {
                self.entries[index].marker = Marker::Removed;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Rewrites the manifest file from offset 0.
    pub fn flush(&mut self) -> Result<()> {
        let bytes = codec::encode(&self.entries);

        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::access("seek", &self.path, e))?;
        self.file
            .set_len(0)
            .map_err(|e| Error::access("truncate", &self.path, e))?;
        self.file
            .write_all(&bytes)
            .map_err(|e| Error::access("write", &self.path, e))?;
        self.file
            .sync_all()
            .map_err(|e| Error::access("sync", &self.path, e))?;

        self.dirty = false;
        debug!(
            "Flushed {} records to {:?}",
            self.entries.len(),
            self.path
        );
        Ok(())
    }
}
