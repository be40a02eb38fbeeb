//! Common types for the importer

use crate::aggregator::FailureReport;
use crate::ImportError;
use modsmith_core::AssetType;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single file waiting in the import queue
///
/// Immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    path: PathBuf,
    preferred_type: Option<AssetType>,
}

impl ImportItem {
    pub fn new(path: impl Into<PathBuf>, preferred_type: Option<AssetType>) -> Self {
        Self {
            path: path.into(),
            preferred_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Asset type the caller expects this file to be
    pub fn preferred_type(&self) -> Option<&AssetType> {
        self.preferred_type.as_ref()
    }
}

/// Why an item finished without installing anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandledReason {
    /// Loader mismatch; the user opened the repatch flow
    RepatchRequested,
    /// Loader mismatch; the user chose "Not now"
    RepatchDeclined,
    /// Version mismatch; the user cancelled
    VersionDeclined,
}

/// Terminal result of processing one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// A package was installed and the mod set saved
    PackageInstalled { id: String },
    /// The file was copied as the given asset type
    AssetCopied { asset_type: String },
    /// Resolved without installing and without error
    Handled { reason: HandledReason },
    /// The user cancelled the asset type choice
    Abandoned,
    /// The import failed
    Failed { error: ImportError },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ItemOutcome::PackageInstalled { .. } | ItemOutcome::AssetCopied { .. }
        )
    }
}

impl From<ImportError> for ItemOutcome {
    fn from(error: ImportError) -> Self {
        ItemOutcome::Failed { error }
    }
}

/// Summary of one drain of the import queue
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    /// Items processed, including ones merged in mid-drain
    pub processed: usize,

    /// Packages installed plus assets copied
    pub succeeded: usize,

    /// Items resolved by a prompt without installing
    pub handled: usize,

    /// Items whose asset type choice was cancelled
    pub abandoned: usize,

    /// Items that failed
    pub failed: usize,

    /// Failure report shown to the user
    pub report: FailureReport,

    /// Wall time of the drain
    pub duration: Duration,
}

impl ImportSummary {
    pub fn summary_text(&self) -> String {
        format!(
            "Import complete: {} of {} succeeded, {} handled, {} cancelled, {} failed",
            self.succeeded, self.processed, self.handled, self.abandoned, self.failed
        )
    }
}

/// What happened to a submission
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// This call ran the drain to completion
    Completed { summary: ImportSummary },
    /// Appended to a drain that was already running
    Merged { queued: usize },
    /// Rejected before anything was queued
    Rejected { error: ImportError },
}

impl ImportOutcome {
    /// The summary, when this call ran the drain
    pub fn summary(&self) -> Option<&ImportSummary> {
        match self {
            ImportOutcome::Completed { summary } => Some(summary),
            _ => None,
        }
    }
}

/// Progress update emitted while draining
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ImportEvent {
    DrainStarted { queued: usize },
    /// `index` is 1-based; the total is unknown while items can still be merged
    ItemStarted { path: PathBuf, index: usize },
    ItemFinished { path: PathBuf, outcome: ItemOutcome },
    DrainFinished { summary: ImportSummary },
}
