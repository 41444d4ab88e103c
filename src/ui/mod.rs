//! Terminal output

mod progress;
mod summary;

pub use progress::ProgressReporter;
pub use summary::{format_error_summary, format_request, format_summary};
