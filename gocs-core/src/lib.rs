//! # gocs-core
//!
//! Core library for gocs - a minimal local change tracker.
//!
//! A repository keeps a manifest of tracked paths in `.gocs/conf` and the
//! latest content of each tracked file under `.gocs/track/`, mirroring the
//! working tree layout.

pub mod codec;
pub mod diff;
pub mod error;
pub mod manifest;
pub mod models;
pub mod paths;
pub mod repository;
pub mod snapshot;

pub use error::{Error, ErrorKind, Result, ResultCode};
pub use manifest::Manifest;
pub use models::{
    EntryStatus, FileState, Marker, StatusEntry, TrackKind, TrackOutcome, TrackedEntry,
    UntrackOutcome,
};
pub use repository::{Repository, RepositoryOptions};
pub use snapshot::SnapshotStore;
