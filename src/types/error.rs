//! Error types for flattener

use super::ErrorKind;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for flattener operations
#[derive(Debug, Error)]
pub enum FlattenError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// Malformed request, rejected before discovery runs
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source root missing or not a directory
    #[error("Discovery error: {path}: {reason}")]
    Discovery { path: PathBuf, reason: String },

    /// Content could not be read while comparing two files
    #[error("Hash error: {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Copy or move into the destination failed
    #[error("Placement failed: {source_path} -> {destination}: {source}")]
    Placement {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: IoError,
    },

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Destination filesystem ran out of space
    #[error("Disk full while writing {path}")]
    DiskFull { path: PathBuf },

    /// Profile store could not read or write a profile
    #[error("Profile store error: {0}")]
    Profile(String),

    /// No profile stored under this name
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
}

impl FlattenError {
    /// Check if this error aborts a whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, FlattenError::Config(_) | FlattenError::Discovery { .. })
    }

    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, FlattenError::Config(_))
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        match self {
            FlattenError::PermissionDenied { .. } => true,
            FlattenError::Io(e) => e.kind() == IoErrorKind::PermissionDenied,
            FlattenError::Hash { source, .. } | FlattenError::Placement { source, .. } => {
                source.kind() == IoErrorKind::PermissionDenied
            }
            _ => false,
        }
    }

    /// Check if this error is related to disk space
    pub fn is_disk_space_error(&self) -> bool {
        matches!(self, FlattenError::DiskFull { .. })
    }

    /// Outcome kind used when this error is recorded against a single file.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlattenError::Hash { .. } => ErrorKind::Hash,
            FlattenError::Discovery { .. } => ErrorKind::Traversal,
            _ => ErrorKind::Placement,
        }
    }

    /// Build a placement error, classifying permission and out-of-space failures.
    pub fn placement(source_path: &Path, destination: &Path, error: IoError) -> Self {
        if error.kind() == IoErrorKind::PermissionDenied {
            FlattenError::PermissionDenied {
                path: destination.to_path_buf(),
            }
        } else if is_storage_full(&error) {
            FlattenError::DiskFull {
                path: destination.to_path_buf(),
            }
        } else {
            FlattenError::Placement {
                source_path: source_path.to_path_buf(),
                destination: destination.to_path_buf(),
                source: error,
            }
        }
    }

    /// Build a hash error for the file that could not be read.
    pub fn hash(path: &Path, error: IoError) -> Self {
        FlattenError::Hash {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

fn is_storage_full(error: &IoError) -> bool {
    // ENOSPC on unix, ERROR_DISK_FULL on windows
    error.kind() == IoErrorKind::StorageFull || matches!(error.raw_os_error(), Some(28 | 112))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_automatic_conversion() {
        let io_error = IoError::new(IoErrorKind::NotFound, "file not found");
        let error: FlattenError = io_error.into();

        assert!(matches!(error, FlattenError::Io(_)));
        assert!(error.to_string().contains("IO error"));
    }

    #[test]
    fn test_config_error_is_fatal() {
        let error = FlattenError::Config("extension filter is empty".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.is_config_error());
        assert!(error.is_fatal());
    }

    #[test]
    fn test_discovery_error_is_fatal() {
        let error = FlattenError::Discovery {
            path: PathBuf::from("/missing"),
            reason: "does not exist".to_string(),
        };
        assert!(error.is_fatal());
        assert!(!error.is_config_error());
        assert!(error.to_string().contains("/missing"));
    }

    #[test]
    fn test_per_file_errors_are_not_fatal() {
        let hash = FlattenError::hash(
            Path::new("a.wav"),
            IoError::new(IoErrorKind::UnexpectedEof, "short read"),
        );
        assert!(!hash.is_fatal());
        assert_eq!(hash.kind(), ErrorKind::Hash);

        let placement = FlattenError::placement(
            Path::new("a.wav"),
            Path::new("out/a.wav"),
            IoError::other("boom"),
        );
        assert!(!placement.is_fatal());
        assert_eq!(placement.kind(), ErrorKind::Placement);
        assert!(placement.to_string().contains("out/a.wav"));
    }

    #[test]
    fn test_placement_classifies_permission_denied() {
        let error = FlattenError::placement(
            Path::new("a.wav"),
            Path::new("/protected/a.wav"),
            IoError::new(IoErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(error, FlattenError::PermissionDenied { .. }));
        assert!(error.is_permission_error());
        assert_eq!(error.kind(), ErrorKind::Placement);
    }

    #[test]
    fn test_placement_classifies_disk_full() {
        let error = FlattenError::placement(
            Path::new("a.wav"),
            Path::new("out/a.wav"),
            IoError::from_raw_os_error(28),
        );
        assert!(error.is_disk_space_error());
        assert!(error.to_string().contains("Disk full"));
    }

    #[test]
    fn test_hash_permission_error_detected() {
        let error = FlattenError::hash(
            Path::new("locked.wav"),
            IoError::new(IoErrorKind::PermissionDenied, "denied"),
        );
        assert!(error.is_permission_error());
    }

    #[test]
    fn test_profile_errors() {
        let missing = FlattenError::ProfileNotFound("drums".to_string());
        assert!(missing.to_string().contains("drums"));
        assert!(!missing.is_fatal());

        let store = FlattenError::Profile("unreadable".to_string());
        assert!(store.to_string().contains("Profile store error"));
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<(), FlattenError> {
            Err(FlattenError::Config("test error".to_string()))
        }

        fn outer() -> Result<(), FlattenError> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer().unwrap_err(), FlattenError::Config(_)));
    }
}
