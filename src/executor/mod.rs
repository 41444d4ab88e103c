//! Consolidation engine: discovery, placement decisions and execution

pub mod copy;
pub mod place;

use crate::hash::files_identical;
use crate::naming::{is_occupied, next_free_name, suffixed_names};
use crate::scanner::{Discovered, Discovery};
use crate::types::{
    ConsolidationRequest, ErrorKind, FileEntry, FileOutcome, FlattenError, OperationResult,
    PlacementOutcome,
};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub use copy::copy_file_atomic;
pub use place::place_file;

/// Events emitted while a consolidation runs.
#[derive(Debug)]
pub enum ConsolidationEvent<'a> {
    /// Discovery finished; `total` items will be processed.
    Discovered { total: usize },
    /// Processing of one item started.
    EntryStart {
        index: usize,
        total: usize,
        path: &'a Path,
    },
    /// One item reached its outcome.
    EntryDone {
        index: usize,
        total: usize,
        outcome: &'a FileOutcome,
    },
    /// Every item has an outcome.
    Complete { result: &'a OperationResult },
}

/// Optional callback used to receive consolidation events.
pub type EventCallback = dyn Fn(&ConsolidationEvent<'_>) + Send + Sync;

/// Flattens a source tree into one destination directory.
///
/// Items are processed strictly one after another in discovery order, since
/// the name chosen for an item depends on what earlier items placed.
#[derive(Default)]
pub struct ConsolidationEngine<'a> {
    on_event: Option<&'a EventCallback>,
}

impl<'a> ConsolidationEngine<'a> {
    pub fn new() -> Self {
        Self { on_event: None }
    }

    /// Report progress through `callback`
    pub fn with_events(callback: &'a EventCallback) -> Self {
        Self {
            on_event: Some(callback),
        }
    }

    /// Run one consolidation.
    ///
    /// # Errors
    /// * `FlattenError::Config` if the request is malformed or the destination
    ///   cannot be created
    /// * `FlattenError::Discovery` if the source root is missing or not a directory
    ///
    /// Nothing is placed when either error is returned. Every other failure is
    /// recorded against its file in the returned [`OperationResult`].
    pub fn consolidate(
        &self,
        request: &ConsolidationRequest,
    ) -> Result<OperationResult, FlattenError> {
        request.validate()?;

        let discovery = Discovery::new(&request.source_root, request.extension_filter.clone())?;

        fs::create_dir_all(&request.dest_root).map_err(|e| {
            FlattenError::Config(format!(
                "Cannot create destination {}: {}",
                request.dest_root.display(),
                e
            ))
        })?;

        let items = discovery.excluding(&request.dest_root).scan(None)?;
        let total = items.len();
        info!(
            source = %request.source_root.display(),
            dest = %request.dest_root.display(),
            mode = %request.operation_mode,
            total,
            "consolidation started"
        );
        self.emit(ConsolidationEvent::Discovered { total });

        let mut result = OperationResult::new();
        for (idx, item) in items.iter().enumerate() {
            let index = idx + 1;
            self.emit(ConsolidationEvent::EntryStart {
                index,
                total,
                path: item.source_path(),
            });

            let outcome = match item {
                Discovered::File(entry) => place_entry(entry, request),
                Discovered::Unreadable { path, detail, .. } => FileOutcome {
                    source: path.clone(),
                    conflict: false,
                    outcome: PlacementOutcome::error(ErrorKind::Traversal, detail.clone()),
                },
            };

            self.emit(ConsolidationEvent::EntryDone {
                index,
                total,
                outcome: &outcome,
            });
            result.record(outcome);
        }

        info!(
            processed = result.processed_count,
            skipped = result.skipped_count,
            conflicts = result.conflict_count,
            errors = result.error_count,
            "consolidation complete"
        );
        self.emit(ConsolidationEvent::Complete { result: &result });

        Ok(result)
    }

    fn emit(&self, event: ConsolidationEvent<'_>) {
        if let Some(callback) = self.on_event {
            callback(&event);
        }
    }
}

/// Run one consolidation without progress events.
pub fn consolidate(request: &ConsolidationRequest) -> Result<OperationResult, FlattenError> {
    ConsolidationEngine::new().consolidate(request)
}

/// Decide and execute the placement of one file.
fn place_entry(entry: &FileEntry, request: &ConsolidationRequest) -> FileOutcome {
    let source = entry.absolute_path.clone();
    let dest_root = &request.dest_root;

    let Some(basename) = entry.basename() else {
        return FileOutcome {
            source,
            conflict: false,
            outcome: PlacementOutcome::error(ErrorKind::Placement, "source path has no file name"),
        };
    };

    let desired = dest_root.join(basename);
    if !is_occupied(&desired) {
        let outcome = execute(&source, &desired, request);
        return FileOutcome {
            source,
            conflict: false,
            outcome,
        };
    }

    let outcome = match find_twin(&source, dest_root, basename) {
        Ok(Some(twin)) => {
            info!(
                src = %source.display(),
                dest = %twin.to_string_lossy(),
                "skipping identical file"
            );
            PlacementOutcome::SkippedIdentical
        }
        Ok(None) => {
            let resolved = next_free_name(dest_root, basename);
            info!(
                src = %source.display(),
                from = %basename.to_string_lossy(),
                to = %resolved.to_string_lossy(),
                "renaming file with different content"
            );
            execute(&source, &dest_root.join(&resolved), request)
        }
        Err(e) => {
            warn!(src = %source.display(), error = %e, "identity check failed");
            PlacementOutcome::error(e.kind(), e.to_string())
        }
    };

    FileOutcome {
        source,
        conflict: true,
        outcome,
    }
}

/// Look for a byte-identical copy of `source` under `basename` or any of its
/// occupied `stem_NNN` variants, stopping at the first free name.
///
/// Files renamed by an earlier run are found again this way, so repeating a
/// copy over an unchanged tree only skips.
fn find_twin(
    source: &Path,
    dest_root: &Path,
    basename: &OsStr,
) -> Result<Option<OsString>, FlattenError> {
    let candidates = std::iter::once(basename.to_os_string()).chain(suffixed_names(basename));
    for name in candidates {
        let path = dest_root.join(&name);
        if !is_occupied(&path) {
            return Ok(None);
        }
        if files_identical(source, &path)? {
            return Ok(Some(name));
        }
    }
    Ok(None)
}

fn execute(source: &Path, dest: &Path, request: &ConsolidationRequest) -> PlacementOutcome {
    match place_file(source, dest, request.operation_mode) {
        Ok(()) => {
            let name = dest
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(
                action = request.operation_mode.verb(),
                src = %source.display(),
                name = %name,
                "placed"
            );
            PlacementOutcome::placed(name)
        }
        Err(e) => {
            warn!(src = %source.display(), dest = %dest.display(), error = %e, "placement failed");
            PlacementOutcome::error(e.kind(), e.to_string())
        }
    }
}
