//! # flattener - Folder Consolidation Tool
//!
//! Collects every file from a nested directory tree into one flat
//! destination directory. Byte-identical duplicates are skipped and
//! name collisions between different files are resolved with numbered
//! suffixes, so nothing is ever overwritten.

// Module declarations
pub mod commands;
pub mod config;
pub mod executor;
pub mod hash;
pub mod logging;
pub mod naming;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use executor::{consolidate, ConsolidationEngine, ConsolidationEvent};
pub use scanner::Discovery;
pub use types::{
    ConsolidationRequest, ErrorKind, ExtensionFilter, FileEntry, FileOutcome, FlattenError,
    OperationMode, OperationResult, PlacementOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
