use crate::error::{Error, Result};
use std::path::{Component, Path};

/// Name of the tracking root directory inside a working tree.
pub const REPO_DIR: &str = ".gocs";
pub const MANIFEST_FILE: &str = "conf";
pub const TRACK_DIR: &str = "track";

/// True when `path` is already in manifest form: relative, `/`-separated,
/// no empty, `.` or `..` segments, and outside the tracking root.
pub fn is_normalized(path: &str) -> bool {
    !path.is_empty()
        && !path.contains(['\n', '\r', '\0'])
        && !path.split('/').any(|seg| matches!(seg, "" | "." | ".."))
        && path.split('/').next() != Some(REPO_DIR)
}

/// Normalizes a user supplied path into the manifest form: relative to `root`,
/// `/`-separated, with no `.` or `..` components.
pub fn normalize(root: &Path, input: impl AsRef<Path>) -> Result<String> {
    let input = input.as_ref();
    let shown = input.to_string_lossy().into_owned();
    let invalid = |reason| Error::InvalidPath {
        path: shown.clone(),
        reason,
    };

    let relative = if input.is_absolute() {
        input
            .strip_prefix(root)
            .map_err(|_| invalid("outside the repository root"))?
    } else {
        input
    };

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| invalid("not valid UTF-8"))?;
                parts.push(part);
            }
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("contains a '..' component")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("outside the repository root"))
            }
        }
    }

    match parts.first() {
        None => return Err(invalid("empty path")),
        Some(&REPO_DIR) => return Err(invalid("inside the tracking root")),
        Some(_) => {}
    }

    let normalized = parts.join("/");
    if normalized.contains(['\n', '\r', '\0']) {
        return Err(invalid("contains a line break or NUL"));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn root() -> PathBuf {
        PathBuf::from("/work/proj")
    }

    #[test]
    fn test_normalize_collapses_dots() {
        assert_eq!(normalize(&root(), "./a//b.txt").unwrap(), "a/b.txt");
        assert_eq!(normalize(&root(), "a/./b.txt").unwrap(), "a/b.txt");
        assert_eq!(normalize(&root(), "notes.md").unwrap(), "notes.md");
    }

    #[test]
    fn test_normalize_strips_root() {
        assert_eq!(
            normalize(&root(), "/work/proj/src/lib.rs").unwrap(),
            "src/lib.rs"
        );
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized("a/b.txt"));
        assert!(is_normalized("notes.md"));
        assert!(!is_normalized("../secret.txt"));
        assert!(!is_normalized("/etc/hostname"));
        assert!(!is_normalized("a//b.txt"));
        assert!(!is_normalized("./a.txt"));
        assert!(!is_normalized(".gocs/conf"));
        assert!(!is_normalized(""));
    }

    #[test]
    fn test_normalize_rejects_escapes() {
        assert!(normalize(&root(), "../secret").is_err());
        assert!(normalize(&root(), "a/../../b").is_err());
        assert!(normalize(&root(), "/etc/passwd").is_err());
        assert!(normalize(&root(), ".").is_err());
        assert!(normalize(&root(), ".gocs/conf").is_err());
        assert!(normalize(&root(), "bad\nname").is_err());
    }
}
