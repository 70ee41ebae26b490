use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a failure as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A filesystem operation failed for an otherwise well-formed request.
    /// Retrying may succeed.
    Access,
    /// The repository's own structure or invariants are broken.
    Fatal,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not {op} {}: {source}", .path.display())]
    Access {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read working file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write snapshot {}: {source}", .path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest {} exists but is empty", .0.display())]
    EmptyManifest(PathBuf),

    #[error("corrupt manifest {}: {reason}", .path.display())]
    CorruptManifest { path: PathBuf, reason: String },

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },
}

impl Error {
    pub(crate) fn access(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Access {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::CorruptManifest {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Access { .. } => ErrorKind::Access,
            Error::Unreadable { .. }
            | Error::CreateDir { .. }
            | Error::SnapshotWrite { .. }
            | Error::EmptyManifest(_)
            | Error::CorruptManifest { .. }
            | Error::InvalidPath { .. } => ErrorKind::Fatal,
        }
    }
}

/// Result codes surfaced to callers and used as process exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    NotTracked,
    AccessError,
    FatalError,
}

impl ResultCode {
    pub fn exit_code(self) -> u8 {
        match self {
            ResultCode::Ok => 0,
            ResultCode::AccessError => 1,
            ResultCode::NotTracked => 2,
            ResultCode::FatalError => 255,
        }
    }
}

impl From<&Error> for ResultCode {
    fn from(err: &Error) -> Self {
        match err.kind() {
            ErrorKind::Access => ResultCode::AccessError,
            ErrorKind::Fatal => ResultCode::FatalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_classification() {
        let access = Error::access("read", "a.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(access.kind(), ErrorKind::Access);
        assert_eq!(ResultCode::from(&access), ResultCode::AccessError);

        let empty = Error::EmptyManifest(PathBuf::from(".gocs/conf"));
        assert_eq!(empty.kind(), ErrorKind::Fatal);
        assert_eq!(ResultCode::from(&empty).exit_code(), 255);
    }

    #[test]
    fn test_messages_name_operation_and_path() {
        let err = Error::access("remove", "track/a/b.txt", io::Error::from(io::ErrorKind::NotFound));
        let msg = err.to_string();
        assert!(msg.contains("remove"));
        assert!(msg.contains("track/a/b.txt"));
    }
}
