//! OperationResult - Aggregated counts for a consolidation run

use super::{FileOutcome, PlacementOutcome};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Aggregated outcome of one run.
///
/// Counts are only ever changed through [`OperationResult::record`], so every
/// recorded outcome lands in exactly one of processed / skipped / errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Files written to the destination (plain or renamed)
    pub processed_count: usize,

    /// Files skipped because an identical copy was already present
    pub skipped_count: usize,

    /// Files whose plain destination name was already taken
    pub conflict_count: usize,

    /// Files that failed
    pub error_count: usize,

    /// Failed source paths, in processing order
    pub error_paths: Vec<PathBuf>,

    /// Per-file outcomes, in processing order
    pub outcomes: Vec<FileOutcome>,
}

impl OperationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one per-file outcome into the totals
    pub fn record(&mut self, file: FileOutcome) {
        if file.conflict {
            self.conflict_count += 1;
        }

        match &file.outcome {
            PlacementOutcome::Placed { .. } => self.processed_count += 1,
            PlacementOutcome::SkippedIdentical => self.skipped_count += 1,
            PlacementOutcome::Error { .. } => {
                self.error_count += 1;
                self.error_paths.push(file.source.clone());
            }
        }

        self.outcomes.push(file);
    }

    /// Number of source files accounted for
    pub fn total(&self) -> usize {
        self.processed_count + self.skipped_count + self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Iterator over failed outcomes only
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.outcome.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    fn outcome(path: &str, conflict: bool, outcome: PlacementOutcome) -> FileOutcome {
        FileOutcome {
            source: PathBuf::from(path),
            conflict,
            outcome,
        }
    }

    #[test]
    fn test_record_counts_each_variant_once() {
        let mut result = OperationResult::new();
        result.record(outcome("a/x.wav", false, PlacementOutcome::placed("x.wav")));
        result.record(outcome("b/x.wav", true, PlacementOutcome::placed("x_001.wav")));
        result.record(outcome("c/x.wav", true, PlacementOutcome::SkippedIdentical));
        result.record(outcome(
            "d/x.wav",
            true,
            PlacementOutcome::error(ErrorKind::Hash, "unreadable"),
        ));

        assert_eq!(result.processed_count, 2);
        assert_eq!(result.skipped_count, 1);
        assert_eq!(result.conflict_count, 3);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.error_paths, vec![PathBuf::from("d/x.wav")]);
        assert_eq!(result.total(), 4);
        assert_eq!(result.outcomes.len(), 4);
        assert!(result.has_errors());
    }

    #[test]
    fn test_error_paths_keep_processing_order() {
        let mut result = OperationResult::new();
        for path in ["z.wav", "a.wav", "m.wav"] {
            result.record(outcome(
                path,
                false,
                PlacementOutcome::error(ErrorKind::Placement, "denied"),
            ));
        }

        assert_eq!(
            result.error_paths,
            vec![
                PathBuf::from("z.wav"),
                PathBuf::from("a.wav"),
                PathBuf::from("m.wav")
            ]
        );
        assert_eq!(result.failures().count(), 3);
    }

    #[test]
    fn test_empty_result() {
        let result = OperationResult::new();
        assert_eq!(result.total(), 0);
        assert!(!result.has_errors());
    }
}
