//! Progress reporting

use crate::types::{FileOutcome, PlacementOutcome};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Instant;

/// Progress reporter for consolidation runs
pub struct ProgressReporter {
    bar: ProgressBar,
    started_at: Option<Instant>,
    placed: u64,
    skipped: u64,
    failed: u64,
}

impl ProgressReporter {
    /// Create a progress reporter drawing to stderr
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} files | {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        Self {
            bar,
            started_at: None,
            placed: 0,
            skipped: 0,
            failed: 0,
        }
    }

    /// A reporter that draws nothing (`--quiet`, `--json`)
    pub fn hidden() -> Self {
        let reporter = Self::new();
        reporter.bar.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    /// Initialize once discovery knows how many items there are.
    pub fn start(&mut self, total: usize) {
        self.started_at = Some(Instant::now());
        self.placed = 0;
        self.skipped = 0;
        self.failed = 0;
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message("Starting...".to_string());
    }

    /// Update current file indicator.
    pub fn set_current_file(&self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.bar.set_message(name);
    }

    /// Record one finished item.
    pub fn complete_file(&mut self, file: &FileOutcome) {
        match &file.outcome {
            PlacementOutcome::Placed { .. } => self.placed += 1,
            PlacementOutcome::SkippedIdentical => self.skipped += 1,
            PlacementOutcome::Error { kind, detail } => {
                self.failed += 1;
                self.bar.println(format!(
                    "ERROR {} {}: {}",
                    kind,
                    file.source.display(),
                    detail
                ));
            }
        }
        self.bar.inc(1);
    }

    /// Finalize the bar.
    pub fn finish(&self) {
        let elapsed = self
            .started_at
            .map(|started| started.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        self.bar.finish_with_message(format!(
            "Done: {} placed, {} skipped, {} failed in {:.1}s",
            self.placed, self.skipped, self.failed, elapsed
        ));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use std::path::PathBuf;

    fn file(outcome: PlacementOutcome) -> FileOutcome {
        FileOutcome {
            source: PathBuf::from("a/x.wav"),
            conflict: false,
            outcome,
        }
    }

    #[test]
    fn test_progress_counts_each_outcome() {
        let mut reporter = ProgressReporter::hidden();
        reporter.start(3);

        reporter.complete_file(&file(PlacementOutcome::placed("x.wav")));
        reporter.complete_file(&file(PlacementOutcome::SkippedIdentical));
        reporter.complete_file(&file(PlacementOutcome::error(ErrorKind::Placement, "denied")));

        assert_eq!(reporter.bar.position(), 3);
        assert_eq!(reporter.bar.length(), Some(3));
        assert_eq!((reporter.placed, reporter.skipped, reporter.failed), (1, 1, 1));
        reporter.finish();
    }

    #[test]
    fn test_current_file_indicator_shows_basename() {
        let reporter = ProgressReporter::hidden();
        reporter.set_current_file(Path::new("deep/nested/kick.wav"));
        assert_eq!(reporter.bar.message(), "kick.wav");
    }
}
