//! Source-tree discovery

mod walker;

pub use walker::{Discovered, DiscoveredFiles, Discovery, ProgressCallback};
