//! PlacementOutcome - What happened to one discovered source file

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Category of a recovered per-file failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Entry could not be enumerated (unreadable directory, broken link)
    #[serde(rename = "traversal_error")]
    Traversal,

    /// Content could not be read during identity comparison
    #[serde(rename = "hash_error")]
    Hash,

    /// Copy or move into the destination failed
    #[serde(rename = "placement_error")]
    Placement,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Traversal => "Traversal error",
            ErrorKind::Hash => "Hash error",
            ErrorKind::Placement => "Placement error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of placing a single source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// Written to the destination under `name`
    Placed { name: String },

    /// Destination already holds a byte-identical file
    SkippedIdentical,

    /// Failed; the batch carried on
    Error { kind: ErrorKind, detail: String },
}

impl PlacementOutcome {
    pub fn placed(name: impl Into<String>) -> Self {
        PlacementOutcome::Placed { name: name.into() }
    }

    pub fn error(kind: ErrorKind, detail: impl Into<String>) -> Self {
        PlacementOutcome::Error {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, PlacementOutcome::SkippedIdentical)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PlacementOutcome::Error { .. })
    }

    /// Short label for progress output
    pub fn label(&self) -> &'static str {
        match self {
            PlacementOutcome::Placed { .. } => "Placed",
            PlacementOutcome::SkippedIdentical => "Skipped",
            PlacementOutcome::Error { .. } => "Error",
        }
    }
}

/// One source path together with its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Absolute source path
    pub source: PathBuf,

    /// The unsuffixed destination name was already taken at decision time
    pub conflict: bool,

    pub outcome: PlacementOutcome,
}
