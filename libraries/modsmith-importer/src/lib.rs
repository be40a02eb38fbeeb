//! Modsmith Importer
//!
//! Turns an arbitrary batch of file paths into installed mods and copied
//! assets, one file at a time, under the process-wide operation lock.
//!
//! # Features
//!
//! - Classification: package first, then asset types by extension
//! - Interactive choice when a file matches several asset types
//! - Loader and version checks before a package is installed
//! - A single merged queue per session: later batches join the running drain
//! - One aggregated failure report per drain
//!
//! # Architecture
//!
//! - `classifier`: package / asset / unrecognized classification
//! - `resolver`: ambiguity prompt between asset types
//! - `install`: package install decision state machine
//! - `queue`: the import queue and the drain slot owning it
//! - `aggregator`: failure collection and report rendering
//! - `importer`: the controller driving the drain loop
//! - `registry`: in-memory asset type registry

mod error;
mod types;

pub mod aggregator;
pub mod classifier;
pub mod importer;
pub mod install;
pub mod queue;
pub mod registry;
pub mod resolver;

pub use aggregator::{FailureAggregator, FailureReport};
pub use classifier::{Classification, Classifier};
pub use error::{FailureKind, ImportError};
pub use importer::{Collaborators, ImportController};
pub use registry::InMemoryAssetRegistry;
pub use types::*;

/// Result type for importer operations
pub type Result<T> = std::result::Result<T, ImportError>;
