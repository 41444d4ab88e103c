//! Plain-text run summaries

use crate::types::{ConsolidationRequest, ErrorKind, FileOutcome, OperationResult, PlacementOutcome};
use std::collections::BTreeMap;
use std::path::Path;

/// Counts plus every failed path, so a user can retry selectively
pub fn format_summary(result: &OperationResult, dest_root: &Path) -> String {
    let mut lines = vec![
        "Operation complete".to_string(),
        format!("  Files processed: {}", result.processed_count),
        format!("  Files skipped:   {}", result.skipped_count),
        format!("  Name conflicts:  {}", result.conflict_count),
        format!("  Errors:          {}", result.error_count),
    ];

    if !result.error_paths.is_empty() {
        lines.push("Files with errors:".to_string());
        for path in &result.error_paths {
            lines.push(format!("  - {}", path.display()));
        }
    }

    lines.push(format!("Output directory: {}", dest_root.display()));
    lines.join("\n")
}

/// Failures grouped by kind with a hint per group
pub fn format_error_summary(result: &OperationResult) -> String {
    let mut groups: BTreeMap<ErrorKind, Vec<(&FileOutcome, &str)>> = BTreeMap::new();
    for file in result.failures() {
        if let PlacementOutcome::Error { kind, detail } = &file.outcome {
            groups.entry(*kind).or_default().push((file, detail.as_str()));
        }
    }

    let mut lines = vec!["Error summary:".to_string()];
    for (kind, items) in groups {
        lines.push(format!("  {} ({}):", kind, items.len()));
        for (file, detail) in items.iter().take(3) {
            lines.push(format!("    - {}", detail));
            lines.push(format!("      Path: {}", file.source.display()));
        }
        if items.len() > 3 {
            lines.push(format!("    - ... {} more", items.len() - 3));
        }
        lines.push(format!("      Try: {}", suggestion(kind)));
    }
    lines.join("\n")
}

fn suggestion(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Traversal => "Check directory permissions and dangling symlinks, then re-run.",
        ErrorKind::Hash => {
            "Check that both the source and the existing destination file are readable, then re-run."
        }
        ErrorKind::Placement => {
            "Check destination permissions and free space, then re-run; placed files are skipped."
        }
    }
}

/// One request, as shown by `profile show` and before a run
pub fn format_request(request: &ConsolidationRequest) -> String {
    let extensions = request
        .extension_filter
        .as_ref()
        .map(|f| f.to_string())
        .unwrap_or_else(|| "All files".to_string());

    [
        format!("  Source:      {}", request.source_root.display()),
        format!("  Destination: {}", request.dest_root.display()),
        format!("  Extensions:  {}", extensions),
        format!("  Operation:   {}", request.operation_mode),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtensionFilter, OperationMode};
    use std::path::PathBuf;

    fn failed(path: &str, kind: ErrorKind, detail: &str) -> FileOutcome {
        FileOutcome {
            source: PathBuf::from(path),
            conflict: false,
            outcome: PlacementOutcome::error(kind, detail),
        }
    }

    #[test]
    fn test_summary_lists_counts_and_every_failed_path() {
        let mut result = OperationResult::new();
        result.record(FileOutcome {
            source: PathBuf::from("a/x.wav"),
            conflict: false,
            outcome: PlacementOutcome::placed("x.wav"),
        });
        for i in 0..5 {
            result.record(failed(
                &format!("bad/{}.wav", i),
                ErrorKind::Placement,
                "denied",
            ));
        }

        let summary = format_summary(&result, Path::new("/out"));
        assert!(summary.contains("Files processed: 1"));
        assert!(summary.contains("Errors:          5"));
        for i in 0..5 {
            assert!(summary.contains(&format!("- bad/{}.wav", i)));
        }
        assert!(summary.contains("Output directory: /out"));
    }

    #[test]
    fn test_error_summary_groups_by_kind() {
        let mut result = OperationResult::new();
        result.record(failed("a.wav", ErrorKind::Hash, "short read"));
        result.record(failed("b.wav", ErrorKind::Placement, "disk full"));
        result.record(failed("c.wav", ErrorKind::Hash, "permission denied"));

        let summary = format_error_summary(&result);
        assert!(summary.contains("Hash error (2):"));
        assert!(summary.contains("Placement error (1):"));
        assert!(summary.contains("Path: a.wav"));
        assert!(summary.contains("Try: Check destination permissions"));
    }

    #[test]
    fn test_error_summary_truncates_long_groups() {
        let mut result = OperationResult::new();
        for i in 0..5 {
            result.record(failed(&format!("{}.wav", i), ErrorKind::Traversal, "denied"));
        }

        let summary = format_error_summary(&result);
        assert!(summary.contains("Traversal error (5):"));
        assert!(summary.contains("... 2 more"));
    }

    #[test]
    fn test_format_request() {
        let request = ConsolidationRequest::new("/in", "/out")
            .with_extensions(ExtensionFilter::new(["wav", "aif"]).unwrap())
            .with_mode(OperationMode::Move);

        let text = format_request(&request);
        assert!(text.contains("Source:      /in"));
        assert!(text.contains("Extensions:  aif, wav"));
        assert!(text.contains("Operation:   Move"));

        let all = format_request(&ConsolidationRequest::new("/in", "/out"));
        assert!(all.contains("All files"));
    }
}
