//! Sequential source-tree walker

use crate::types::{ExtensionFilter, FileEntry, FlattenError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// Callback for reporting scan progress
///
/// Arguments:
/// - `items_found`: Number of candidate items collected so far
pub type ProgressCallback = Box<dyn Fn(u64) + Send + Sync>;

/// One item produced by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    /// A regular file (or a symlink resolving to one) that passed the filter
    File(FileEntry),

    /// Something under the root that could not be enumerated or resolved
    Unreadable {
        path: PathBuf,
        relative_path: PathBuf,
        detail: String,
    },
}

impl Discovered {
    /// Path relative to the source root; the sort key
    pub fn relative_path(&self) -> &Path {
        match self {
            Discovered::File(entry) => &entry.relative_path,
            Discovered::Unreadable { relative_path, .. } => relative_path,
        }
    }

    /// Path of the item on disk
    pub fn source_path(&self) -> &Path {
        match self {
            Discovered::File(entry) => &entry.absolute_path,
            Discovered::Unreadable { path, .. } => path,
        }
    }
}

/// Discovered items sorted by relative path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredFiles {
    items: Vec<Discovered>,
}

impl DiscoveredFiles {
    fn from_unsorted(mut items: Vec<Discovered>) -> Self {
        items.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));
        Self { items }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Discovered> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterator over readable file entries only
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.items.iter().filter_map(|item| match item {
            Discovered::File(entry) => Some(entry),
            Discovered::Unreadable { .. } => None,
        })
    }
}

impl IntoIterator for DiscoveredFiles {
    type Item = Discovered;
    type IntoIter = std::vec::IntoIter<Discovered>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiscoveredFiles {
    type Item = &'a Discovered;
    type IntoIter = std::slice::Iter<'a, Discovered>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Enumerates candidate files under a source root.
///
/// Construction checks that the root is a directory; nothing is walked until
/// [`Discovery::scan`] is called, and every call walks the live tree again.
#[derive(Debug, Clone)]
pub struct Discovery {
    root: PathBuf,
    filter: Option<ExtensionFilter>,
    excluded: Option<PathBuf>,
}

impl Discovery {
    /// Create a discovery over `root`.
    ///
    /// # Errors
    /// * `FlattenError::Discovery` if `root` does not exist or is not a directory
    pub fn new(root: &Path, filter: Option<ExtensionFilter>) -> Result<Self, FlattenError> {
        check_root(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            filter,
            excluded: None,
        })
    }

    /// Skip `subtree` while walking, if it lies inside the root.
    ///
    /// Used so a destination nested in the source is never consumed as input.
    pub fn excluding(mut self, subtree: &Path) -> Self {
        self.excluded = nested_subtree(&self.root, subtree);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and return every candidate, sorted by relative path.
    ///
    /// Hidden files and ignore files are not honoured: the whole subtree is a
    /// candidate. Directory symlinks are not followed. Entries that cannot be
    /// read are returned as [`Discovered::Unreadable`] instead of aborting.
    ///
    /// # Errors
    /// * `FlattenError::Discovery` if the root has disappeared since construction
    pub fn scan(
        &self,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<DiscoveredFiles, FlattenError> {
        check_root(&self.root)?;

        let start_time = Instant::now();
        let mut items = Vec::new();
        let mut found: u64 = 0;

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder.standard_filters(false).follow_links(false);

        if let Some(excluded) = self.excluded.clone() {
            builder.filter_entry(move |entry| entry.path() != excluded.as_path());
        }

        for result in builder.build() {
            let item = match result {
                Ok(entry) => match self.classify(&entry) {
                    Some(item) => item,
                    None => continue,
                },
                Err(err) => {
                    let path = error_path(&err).unwrap_or_else(|| self.root.clone());
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "error during directory traversal, continuing with remaining files"
                    );
                    self.unreadable(path, err.to_string())
                }
            };

            items.push(item);
            found += 1;
            if let Some(callback) = on_progress {
                callback(found);
            }
        }

        debug!(
            root = %self.root.display(),
            items = items.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "discovery finished"
        );

        Ok(DiscoveredFiles::from_unsorted(items))
    }

    fn classify(&self, entry: &ignore::DirEntry) -> Option<Discovered> {
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            return None;
        }

        if !self.passes_filter(path) {
            return None;
        }

        if file_type.is_symlink() {
            // Follow the link only to decide whether it names a regular file
            return match fs::metadata(path) {
                Ok(meta) if meta.is_file() => Some(Discovered::File(self.file_entry(path))),
                Ok(_) => None,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "broken symlink");
                    Some(self.unreadable(path.to_path_buf(), format!("broken symlink: {}", e)))
                }
            };
        }

        if !file_type.is_file() {
            // Pipes, sockets, devices
            return None;
        }

        Some(Discovered::File(self.file_entry(path)))
    }

    fn passes_filter(&self, path: &Path) -> bool {
        match &self.filter {
            Some(filter) => filter.matches(path),
            None => true,
        }
    }

    fn file_entry(&self, path: &Path) -> FileEntry {
        FileEntry::new(path.to_path_buf(), self.relative(path))
    }

    fn unreadable(&self, path: PathBuf, detail: String) -> Discovered {
        Discovered::Unreadable {
            relative_path: self.relative(&path),
            path,
            detail,
        }
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn check_root(root: &Path) -> Result<(), FlattenError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FlattenError::Discovery {
            path: root.to_path_buf(),
            reason: "source is not a directory".to_string(),
        }),
        Err(e) => Err(FlattenError::Discovery {
            path: root.to_path_buf(),
            reason: format!("source cannot be accessed: {}", e),
        }),
    }
}

/// Map `subtree` onto the walker's path form if it lies strictly inside `root`.
fn nested_subtree(root: &Path, subtree: &Path) -> Option<PathBuf> {
    let root_canon = root.canonicalize().ok()?;
    let subtree_canon = subtree.canonicalize().ok()?;
    let relative = subtree_canon.strip_prefix(&root_canon).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(root.join(relative))
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        ignore::Error::Partial(errs) => errs.iter().find_map(error_path),
        _ => None,
    }
}
