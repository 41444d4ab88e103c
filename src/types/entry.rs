//! FileEntry - A single candidate file found under the source root

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::PathBuf;

/// A file discovered under the source root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute (root-joined) path used for all IO
    pub absolute_path: PathBuf,

    /// Path relative to the source root, used for ordering
    pub relative_path: PathBuf,
}

impl FileEntry {
    /// Create a new FileEntry
    pub fn new(absolute_path: PathBuf, relative_path: PathBuf) -> Self {
        Self {
            absolute_path,
            relative_path,
        }
    }

    /// Final path component; the name this file wants in the destination
    pub fn basename(&self) -> Option<&OsStr> {
        self.absolute_path.file_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_entry() {
        let entry = FileEntry::new(
            PathBuf::from("/samples/kicks/kick.wav"),
            PathBuf::from("kicks/kick.wav"),
        );

        assert_eq!(entry.absolute_path, PathBuf::from("/samples/kicks/kick.wav"));
        assert_eq!(entry.relative_path, PathBuf::from("kicks/kick.wav"));
        assert_eq!(entry.basename(), Some(OsStr::new("kick.wav")));
    }

    #[test]
    fn test_basename_without_extension() {
        let entry = FileEntry::new(PathBuf::from("/root/a/README"), PathBuf::from("a/README"));
        assert_eq!(entry.basename(), Some(OsStr::new("README")));
    }

    #[test]
    fn test_serialization() {
        let entry = FileEntry::new(PathBuf::from("/src/x.wav"), PathBuf::from("x.wav"));

        let serialized = serde_json::to_string(&entry).expect("Failed to serialize");
        let deserialized: FileEntry =
            serde_json::from_str(&serialized).expect("Failed to deserialize");

        assert_eq!(entry, deserialized);
    }
}
