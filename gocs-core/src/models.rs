use serde::{Deserialize, Serialize};

/// Record marker written in front of each manifest path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Added,
    Updated,
    Removed,
}

impl Marker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::Added => "++",
            Marker::Updated => "--/++",
            Marker::Removed => "--",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "++" => Some(Marker::Added),
            "--/++" => Some(Marker::Updated),
            "--" => Some(Marker::Removed),
            _ => None,
        }
    }

    pub fn status(&self) -> EntryStatus {
        match self {
            Marker::Added | Marker::Updated => EntryStatus::Active,
            Marker::Removed => EntryStatus::Removed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Removed,
}

/// One slot of the manifest: a normalized path and how it was last recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntry {
    pub path: String,
    pub marker: Marker,
}

impl TrackedEntry {
    pub fn new(path: impl Into<String>, marker: Marker) -> Self {
        Self {
            path: path.into(),
            marker,
        }
    }

    pub fn status(&self) -> EntryStatus {
        self.marker.status()
    }

    pub fn is_active(&self) -> bool {
        self.status() == EntryStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Added,
    Updated,
}

impl TrackKind {
    pub fn marker(&self) -> Marker {
        match self {
            TrackKind::Added => Marker::Added,
            TrackKind::Updated => Marker::Updated,
        }
    }
}

/// What a successful `track` did.
#[derive(Debug, Clone)]
pub struct TrackOutcome {
    pub path: String,
    pub kind: TrackKind,
    /// Unified diff of the previous snapshot against the new content.
    /// `None` for a fresh add; empty when the content did not change.
    pub diff: Option<String>,
    pub content_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UntrackOutcome {
    Removed,
    NotTracked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    Clean,
    Modified,
    Missing,
}

impl FileState {
    pub fn as_str(&self) -> &str {
        match self {
            FileState::Clean => "clean",
            FileState::Modified => "modified",
            FileState::Missing => "missing",
        }
    }
}

/// Working-tree state of one Active path relative to its snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub path: String,
    pub state: FileState,
    pub snapshot_hash: Option<String>,
    pub working_hash: Option<String>,
}

pub fn hash_content(content: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
