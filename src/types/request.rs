//! ConsolidationRequest - Immutable input to one consolidation run

use super::FlattenError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether placed files are copied or moved out of the source tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    /// Leave originals in place
    #[default]
    Copy,

    /// Remove originals once placed
    Move,
}

impl OperationMode {
    /// Verb used in logs and progress output
    pub fn verb(&self) -> &'static str {
        match self {
            OperationMode::Copy => "Copy",
            OperationMode::Move => "Move",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Non-empty set of lowercase alphanumeric extensions (without the dot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Build a filter from user-supplied extensions.
    ///
    /// Each value is trimmed, stripped of leading dots and lowercased, so
    /// `".WAV"`, `"wav"` and `" Wav "` are the same extension. The resulting
    /// set must be non-empty and every member alphanumeric.
    pub fn new<I, S>(extensions: I) -> Result<Self, FlattenError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for raw in extensions {
            let normalized = raw.as_ref().trim().trim_start_matches('.').to_lowercase();
            if normalized.is_empty() {
                return Err(FlattenError::Config(format!(
                    "Invalid extension '{}': extension is empty",
                    raw.as_ref()
                )));
            }
            if !normalized.chars().all(|c| c.is_alphanumeric()) {
                return Err(FlattenError::Config(format!(
                    "Invalid extension '{}': only letters and digits are allowed",
                    raw.as_ref()
                )));
            }
            set.insert(normalized);
        }

        if set.is_empty() {
            return Err(FlattenError::Config(
                "Extension filter is present but empty".to_string(),
            ));
        }

        Ok(Self { extensions: set })
    }

    /// Check whether `path` has one of the allowed extensions (case-insensitive).
    ///
    /// Only the suffix after the final '.' counts; names without one never match.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Iterator over the normalized extensions, in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl TryFrom<Vec<String>> for ExtensionFilter {
    type Error = FlattenError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExtensionFilter> for Vec<String> {
    fn from(filter: ExtensionFilter) -> Self {
        filter.extensions.into_iter().collect()
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.iter().collect::<Vec<_>>().join(", ");
        f.write_str(&joined)
    }
}

/// Input to one consolidation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationRequest {
    /// Root of the nested tree to collect files from
    pub source_root: PathBuf,

    /// Flat destination directory (created if absent)
    pub dest_root: PathBuf,

    /// Allowed extensions; `None` means every file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_filter: Option<ExtensionFilter>,

    /// Copy or move
    #[serde(default)]
    pub operation_mode: OperationMode,
}

impl ConsolidationRequest {
    /// Create a copy-mode request without an extension filter
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            extension_filter: None,
            operation_mode: OperationMode::Copy,
        }
    }

    /// Restrict the run to the given extensions
    pub fn with_extensions(mut self, filter: ExtensionFilter) -> Self {
        self.extension_filter = Some(filter);
        self
    }

    /// Set copy or move behaviour
    pub fn with_mode(mut self, mode: OperationMode) -> Self {
        self.operation_mode = mode;
        self
    }

    /// Validate the request before discovery runs.
    ///
    /// Source existence is checked by discovery itself; this only rejects
    /// requests that are malformed regardless of the filesystem's contents.
    pub fn validate(&self) -> Result<(), FlattenError> {
        if self.source_root.as_os_str().is_empty() {
            return Err(FlattenError::Config("Source path is empty".to_string()));
        }

        if self.dest_root.as_os_str().is_empty() {
            return Err(FlattenError::Config(
                "Destination path is empty".to_string(),
            ));
        }

        if let Some(filter) = &self.extension_filter {
            if filter.is_empty() {
                return Err(FlattenError::Config(
                    "Extension filter is present but empty".to_string(),
                ));
            }
        }

        if same_location(&self.source_root, &self.dest_root) {
            return Err(FlattenError::Config(
                "Source and destination cannot be the same".to_string(),
            ));
        }

        if self.dest_root.exists() && !self.dest_root.is_dir() {
            return Err(FlattenError::Config(format!(
                "Destination exists but is not a directory: {}",
                self.dest_root.display()
            )));
        }

        Ok(())
    }
}

fn same_location(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
