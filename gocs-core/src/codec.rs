//! On-disk encoding of the manifest.
//!
//! The file is a header line followed by exactly `count` newline-terminated
//! records:
//!
//! ```text
//! gocs 1.0.0 2
//! ++:src/main.rs
//! --/++:README.md
//! ```
//!
//! The record count in the header marks where valid data ends, so anything
//! written past the last counted record is treated as an interrupted write.

use crate::error::{Error, Result};
use crate::models::{Marker, TrackedEntry};
use crate::paths;
use std::path::Path;

const MAGIC: &str = "gocs";
pub const FORMAT_REV: &str = "1.0.0";

#[derive(Debug)]
pub struct Decoded {
    pub entries: Vec<TrackedEntry>,
    /// Bytes following the last counted record.
    pub trailing: usize,
}

pub fn encode_header(count: usize) -> String {
    format!("{} {} {}\n", MAGIC, FORMAT_REV, count)
}

pub fn encode_entry(entry: &TrackedEntry) -> String {
    format!("{}:{}\n", entry.marker.as_str(), entry.path)
}

/// Decodes a single record with its trailing newline already stripped.
pub fn decode_entry(line: &str) -> Option<TrackedEntry> {
    let (marker, path) = line.split_once(':')?;
    let marker = Marker::parse(marker)?;
    if !paths::is_normalized(path) {
        return None;
    }
    Some(TrackedEntry::new(path, marker))
}

pub fn encode(entries: &[TrackedEntry]) -> Vec<u8> {
    let mut out = encode_header(entries.len());
    for entry in entries {
        out.push_str(&encode_entry(entry));
    }
    out.into_bytes()
}

/// Decodes a full manifest. `source` is only used in error messages.
pub fn decode(bytes: &[u8], source: &Path) -> Result<Decoded> {
    if bytes.is_empty() {
        return Err(Error::EmptyManifest(source.to_path_buf()));
    }

    let mut lines = Lines { bytes, pos: 0 };

    let header = lines
        .next_line()
        .ok_or_else(|| Error::corrupt(source, "missing header line"))?;
    let header =
        std::str::from_utf8(header).map_err(|_| Error::corrupt(source, "header is not UTF-8"))?;
    let count = parse_header(header).map_err(|reason| Error::corrupt(source, reason))?;

    let mut entries = Vec::with_capacity(count);
    for index in 0..count {
        let line = lines.next_line().ok_or_else(|| {
            Error::corrupt(
                source,
                format!("expected {} records, found {}", count, index),
            )
        })?;
        let entry = std::str::from_utf8(line)
            .ok()
            .and_then(decode_entry)
            .ok_or_else(|| Error::corrupt(source, format!("unreadable record {}", index + 1)))?;
        entries.push(entry);
    }

    Ok(Decoded {
        entries,
        trailing: bytes.len() - lines.pos,
    })
}

fn parse_header(header: &str) -> std::result::Result<usize, String> {
    let mut fields = header.split(' ');
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(MAGIC), Some(rev), Some(count), None) => {
            if rev != FORMAT_REV {
                return Err(format!("unsupported format revision {}", rev));
            }
            count
                .parse()
                .map_err(|_| format!("bad record count {:?}", count))
        }
        _ => Err(format!("bad header {:?}", header)),
    }
}

struct Lines<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    /// Returns the next complete line without its `\n`. A final line with no
    /// terminator is not returned.
    fn next_line(&mut self) -> Option<&'a [u8]> {
        let rest = &self.bytes[self.pos..];
        let end = rest.iter().position(|&b| b == b'\n')?;
        self.pos += end + 1;
        Some(&rest[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf() -> &'static Path {
        Path::new(".gocs/conf")
    }

    #[test]
    fn test_encode_layout() {
        let entries = vec![
            TrackedEntry::new("a/b.txt", Marker::Added),
            TrackedEntry::new("c.txt", Marker::Updated),
            TrackedEntry::new("d.txt", Marker::Removed),
        ];

        let text = String::from_utf8(encode(&entries)).unwrap();
        assert_eq!(text, "gocs 1.0.0 3\n++:a/b.txt\n--/++:c.txt\n--:d.txt\n");

        let decoded = decode(text.as_bytes(), conf()).unwrap();
        assert_eq!(decoded.entries, entries);
        assert_eq!(decoded.trailing, 0);
    }

    #[test]
    fn test_path_may_contain_colon_and_high_bytes() {
        let entry = decode_entry("++:dir/naïve:v2.txt").unwrap();
        assert_eq!(entry.path, "dir/naïve:v2.txt");
        assert_eq!(entry.marker, Marker::Added);
    }

    #[test]
    fn test_rejects_paths_escaping_root() {
        for record in [
            "++:../secret.txt",
            "++:/etc/hostname",
            "--/++:a/../../b.txt",
            "++:a//b.txt",
            "++:./a.txt",
            "--:.gocs/conf",
        ] {
            assert!(decode_entry(record).is_none(), "accepted {:?}", record);

            let manifest = format!("gocs 1.0.0 1\n{}\n", record);
            assert!(matches!(
                decode(manifest.as_bytes(), conf()),
                Err(Error::CorruptManifest { .. })
            ));
        }
    }

    #[test]
    fn test_trailing_bytes_are_reported() {
        let bytes = b"gocs 1.0.0 1\n++:a.txt\n++:half-writ";
        let decoded = decode(bytes, conf()).unwrap();
        assert_eq!(decoded.entries.len(), 1);
        assert_eq!(decoded.trailing, "++:half-writ".len());
    }

    #[test]
    fn test_empty_manifest_is_error() {
        assert!(matches!(
            decode(b"", conf()),
            Err(Error::EmptyManifest(_))
        ));
    }

    #[test]
    fn test_corrupt_manifests() {
        let cases: [&[u8]; 5] = [
            b"gocs 1.0.0 2\n++:a.txt\n",
            b"gocs 9.9.9 0\n",
            b"svn 1.0.0 0\n",
            b"gocs 1.0.0 1\n??:a.txt\n",
            b"gocs 1.0.0 x\n",
        ];
        for bytes in cases {
            assert!(
                matches!(decode(bytes, conf()), Err(Error::CorruptManifest { .. })),
                "expected corrupt: {:?}",
                String::from_utf8_lossy(bytes)
            );
        }
    }
}
