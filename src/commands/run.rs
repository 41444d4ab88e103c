//! `run` subcommand

use crate::config::{ProfileStore, RunArgs};
use crate::executor::{ConsolidationEngine, ConsolidationEvent};
use crate::types::{ConsolidationRequest, FlattenError, OperationResult};
use crate::ui::{format_error_summary, format_request, format_summary, ProgressReporter};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Resolve the effective request, run it and print the outcome.
///
/// `store` is only consulted for `--profile` and `--save-as`; callers may pass
/// `None` when [`RunArgs::needs_profile_store`] is false.
/// Returns the result so the caller can choose an exit code.
pub fn run(
    args: &RunArgs,
    store: Option<&dyn ProfileStore>,
) -> Result<OperationResult, FlattenError> {
    let request = resolve_request(args, store)?;

    if let Some(name) = &args.save_as {
        require_store(store)?.save(name, &request)?;
        info!(profile = %name, "profile saved");
        if !args.quiet && !args.json {
            println!("Saved profile '{}'", name);
        }
    }

    if !args.quiet && !args.json {
        println!("{}", format_request(&request));
    }

    let reporter = Arc::new(Mutex::new(if args.quiet || args.json {
        ProgressReporter::hidden()
    } else {
        ProgressReporter::new()
    }));

    let progress_cb = {
        let reporter = Arc::clone(&reporter);
        move |event: &ConsolidationEvent<'_>| {
            let Ok(mut progress) = reporter.lock() else {
                return;
            };
            match event {
                ConsolidationEvent::Discovered { total } => progress.start(*total),
                ConsolidationEvent::EntryStart { path, .. } => progress.set_current_file(path),
                ConsolidationEvent::EntryDone { outcome, .. } => progress.complete_file(outcome),
                ConsolidationEvent::Complete { .. } => progress.finish(),
            }
        }
    };

    let result = ConsolidationEngine::with_events(&progress_cb).consolidate(&request)?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| FlattenError::Config(format!("Failed to encode result: {}", e)))?;
        println!("{}", json);
    } else if !args.quiet {
        println!("{}", format_summary(&result, &request.dest_root));
        if result.has_errors() {
            println!("{}", format_error_summary(&result));
        }
    }

    Ok(result)
}

/// Layer explicit arguments over the named profile, if any
pub fn resolve_request(
    args: &RunArgs,
    store: Option<&dyn ProfileStore>,
) -> Result<ConsolidationRequest, FlattenError> {
    let base = match &args.profile {
        Some(name) => Some(require_store(store)?.load(name)?),
        None => None,
    };
    args.to_request(base)
}

fn require_store(store: Option<&dyn ProfileStore>) -> Result<&dyn ProfileStore, FlattenError> {
    store.ok_or_else(|| FlattenError::Config("No profile store available".to_string()))
}
