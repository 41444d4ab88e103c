//! Named request profiles persisted between invocations

use crate::types::{ConsolidationRequest, FlattenError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const PROFILE_EXTENSION: &str = "toml";

/// Storage for named [`ConsolidationRequest`]s.
///
/// The consolidation engine never talks to a store; only the CLI does.
pub trait ProfileStore {
    /// Persist `request` under `name`, replacing any previous profile
    fn save(&self, name: &str, request: &ConsolidationRequest) -> Result<(), FlattenError>;

    /// Load the request saved under `name`
    ///
    /// Returns `FlattenError::ProfileNotFound` when no such profile exists.
    fn load(&self, name: &str) -> Result<ConsolidationRequest, FlattenError>;

    /// Names of all stored profiles, sorted
    fn list(&self) -> Result<Vec<String>, FlattenError>;

    /// Remove the profile saved under `name`
    fn delete(&self, name: &str) -> Result<(), FlattenError>;
}

/// On-disk layout of one profile file
#[derive(Debug, Serialize, Deserialize)]
struct StoredProfile {
    saved_at: DateTime<Utc>,
    request: ConsolidationRequest,
}

/// One `<name>.toml` file per profile inside a directory
#[derive(Debug, Clone)]
pub struct TomlProfileStore {
    dir: PathBuf,
}

impl TomlProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform configuration directory
    /// (e.g. `~/.config/flattener/profiles` on Linux)
    pub fn default_location() -> Result<Self, FlattenError> {
        let base = dirs::config_dir().ok_or_else(|| {
            FlattenError::Config(
                "Could not determine a configuration directory; pass --profile-dir".to_string(),
            )
        })?;
        Ok(Self::new(base.join("flattener").join("profiles")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// When the profile under `name` was last saved
    pub fn saved_at(&self, name: &str) -> Result<DateTime<Utc>, FlattenError> {
        Ok(self.read(name)?.saved_at)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, FlattenError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, PROFILE_EXTENSION)))
    }

    fn read(&self, name: &str) -> Result<StoredProfile, FlattenError> {
        let path = self.path_for(name)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FlattenError::ProfileNotFound(name.to_string()))
            }
            Err(e) => {
                return Err(FlattenError::Profile(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        toml::from_str(&content).map_err(|e| {
            FlattenError::Profile(format!("Malformed profile {}: {}", path.display(), e))
        })
    }
}

impl ProfileStore for TomlProfileStore {
    fn save(&self, name: &str, request: &ConsolidationRequest) -> Result<(), FlattenError> {
        let path = self.path_for(name)?;
        let stored = StoredProfile {
            saved_at: Utc::now(),
            request: request.clone(),
        };
        let content = toml::to_string_pretty(&stored)
            .map_err(|e| FlattenError::Profile(format!("Failed to encode profile '{}': {}", name, e)))?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            FlattenError::Profile(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        // Write-then-rename so a crash never leaves a truncated profile
        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .and_then(|_| fs::rename(&tmp_path, &path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                FlattenError::Profile(format!("Failed to write {}: {}", path.display(), e))
            })
    }

    fn load(&self, name: &str) -> Result<ConsolidationRequest, FlattenError> {
        Ok(self.read(name)?.request)
    }

    fn list(&self) -> Result<Vec<String>, FlattenError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(FlattenError::Profile(format!(
                    "Failed to list {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == PROFILE_EXTENSION))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .filter(|name| validate_name(name).is_ok())
            .collect();
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<(), FlattenError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FlattenError::ProfileNotFound(name.to_string()))
            }
            Err(e) => Err(FlattenError::Profile(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Profile names become file names, so keep them to `[A-Za-z0-9_-]+`
fn validate_name(name: &str) -> Result<(), FlattenError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(FlattenError::Config(format!(
            "Invalid profile name '{}': use letters, digits, '_' or '-'",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtensionFilter, OperationMode};
    use tempfile::TempDir;

    fn sample_request() -> ConsolidationRequest {
        ConsolidationRequest::new("/samples/incoming", "/samples/flat")
            .with_extensions(ExtensionFilter::new(["wav", "aif"]).unwrap())
            .with_mode(OperationMode::Move)
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = TomlProfileStore::new(dir.path().join("profiles"));

        store.save("drums", &sample_request()).unwrap();
        let loaded = store.load("drums").unwrap();

        assert_eq!(loaded, sample_request());
        assert!(store.saved_at("drums").unwrap() <= Utc::now());
    }

    #[test]
    fn test_save_without_filter() {
        let dir = TempDir::new().unwrap();
        let store = TomlProfileStore::new(dir.path());
        let request = ConsolidationRequest::new("/in", "/out");

        store.save("all", &request).unwrap();
        assert_eq!(store.load("all").unwrap(), request);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = TomlProfileStore::new(dir.path());

        let err = store.load("nope").unwrap_err();
        assert!(matches!(err, FlattenError::ProfileNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_list_sorted_and_empty_when_missing_dir() {
        let dir = TempDir::new().unwrap();
        let store = TomlProfileStore::new(dir.path().join("not-yet"));
        assert!(store.list().unwrap().is_empty());

        store.save("zeta", &sample_request()).unwrap();
        store.save("alpha", &sample_request()).unwrap();
        fs::write(store.dir().join("notes.txt"), b"ignored").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = TomlProfileStore::new(dir.path());
        store.save("p", &sample_request()).unwrap();

        let replacement = ConsolidationRequest::new("/a", "/b");
        store.save("p", &replacement).unwrap();

        assert_eq!(store.load("p").unwrap(), replacement);
        assert_eq!(store.list().unwrap(), vec!["p"]);
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let store = TomlProfileStore::new(dir.path());
        store.save("p", &sample_request()).unwrap();

        store.delete("p").unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(
            store.delete("p").unwrap_err(),
            FlattenError::ProfileNotFound(_)
        ));
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = TempDir::new().unwrap();
        let store = TomlProfileStore::new(dir.path());

        for bad in ["", "../escape", "a/b", "with space"] {
            assert!(
                store.save(bad, &sample_request()).unwrap_err().is_config_error(),
                "name {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_malformed_profile_reported() {
        let dir = TempDir::new().unwrap();
        let store = TomlProfileStore::new(dir.path());
        fs::write(dir.path().join("broken.toml"), "request = 5").unwrap();

        assert!(matches!(
            store.load("broken").unwrap_err(),
            FlattenError::Profile(_)
        ));
    }
}
