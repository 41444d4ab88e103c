//! Core type definitions for flattener

mod entry;
mod error;
mod outcome;
mod report;
mod request;

pub use entry::FileEntry;
pub use error::FlattenError;
pub use outcome::{ErrorKind, FileOutcome, PlacementOutcome};
pub use report::OperationResult;
pub use request::{ConsolidationRequest, ExtensionFilter, OperationMode};
