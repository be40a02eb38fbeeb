//! Failure aggregation for one drain
//!
//! Collects per-path failures while the queue drains and turns them into a
//! single report: full detail when exactly one file failed, a count when
//! several did. Per-file detail for multi-failure drains only goes to the log.

use crate::{ImportError, ItemOutcome};
use modsmith_core::{Message, Operation};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::error;

/// Report produced at the end of a drain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum FailureReport {
    /// Nothing failed
    #[default]
    None,
    /// Exactly one file failed
    Single { path: PathBuf, error: ImportError },
    /// Several files failed
    Multiple {
        failures: Vec<(PathBuf, ImportError)>,
        processed: usize,
    },
}

impl FailureReport {
    /// Number of distinct paths that failed
    pub fn failure_count(&self) -> usize {
        match self {
            FailureReport::None => 0,
            FailureReport::Single { .. } => 1,
            FailureReport::Multiple { failures, .. } => failures.len(),
        }
    }

    /// Dialog for this report, if there is anything to show
    pub fn to_message(&self) -> Option<Message> {
        match self {
            FailureReport::None => None,
            FailureReport::Single { path, error } => Some(single_failure_message(path, error)),
            FailureReport::Multiple {
                failures,
                processed,
            } => Some(Message::new(
                "Multiple imports failed",
                format!(
                    "{} out of {} files failed to import. Check the logs for details about each failure.",
                    failures.len(),
                    processed
                ),
            )),
        }
    }
}

/// Collects failures keyed by path
///
/// A later outcome for the same path replaces the earlier entry: a second
/// failure overwrites the error, a success removes it.
#[derive(Debug, Default)]
pub struct FailureAggregator {
    failures: Vec<(PathBuf, ImportError)>,
}

impl FailureAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one item outcome into the aggregate
    pub fn record(&mut self, path: &Path, outcome: &ItemOutcome) {
        let existing = self.failures.iter().position(|(p, _)| p == path);
        match (outcome, existing) {
            (ItemOutcome::Failed { error }, Some(index)) => {
                self.failures[index].1 = error.clone();
            }
            (ItemOutcome::Failed { error }, None) => {
                self.failures.push((path.to_path_buf(), error.clone()));
            }
            (_, Some(index)) => {
                self.failures.remove(index);
            }
            (_, None) => {}
        }
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Finish the drain, logging every failure and building the report
    pub fn finish(self, processed: usize) -> FailureReport {
        for (path, err) in &self.failures {
            match err.detail() {
                Some(detail) => error!("Failed to import {}: {}\n{}", path.display(), err, detail),
                None => error!("Failed to import {}: {}", path.display(), err),
            }
        }

        let mut failures = self.failures;
        match failures.len() {
            0 => FailureReport::None,
            1 => {
                let (path, error) = failures.remove(0);
                FailureReport::Single { path, error }
            }
            _ => FailureReport::Multiple {
                failures,
                processed,
            },
        }
    }
}

/// Dialog shown when a whole submission is rejected
pub fn rejection_message(error: &ImportError) -> Message {
    match error {
        ImportError::Busy { holder } => busy_message(*holder),
        other => Message::new("Import failed", other.to_string()),
    }
}

fn busy_message(holder: Operation) -> Message {
    Message::new(
        "Import failed",
        format!(
            "Another operation ({}) is in progress. Wait for it to finish and try again.",
            holder
        ),
    )
}

fn single_failure_message(path: &Path, error: &ImportError) -> Message {
    let file_name = display_file_name(path);
    let title = format!("Failed to import {}", file_name);

    if error.is_user_facing() {
        return Message::new(title, error.to_string());
    }

    let detail = match error.detail() {
        Some(detail) => detail.to_string(),
        None => error.to_string(),
    };
    Message::new(
        title,
        format!("An unexpected error occurred while importing {}", file_name),
    )
    .with_detail(detail)
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(msg: &str) -> ItemOutcome {
        ItemOutcome::Failed {
            error: ImportError::Installation(msg.to_string()),
        }
    }

    #[test]
    fn test_no_failures_means_no_report() {
        let mut agg = FailureAggregator::new();
        agg.record(
            Path::new("a.qmod"),
            &ItemOutcome::PackageInstalled {
                id: "a".to_string(),
            },
        );
        let report = agg.finish(1);
        assert_eq!(report, FailureReport::None);
        assert!(report.to_message().is_none());
    }

    #[test]
    fn test_single_installation_failure_is_verbatim() {
        let mut agg = FailureAggregator::new();
        agg.record(Path::new("/downloads/d.qmod"), &failed("Mod is missing mod.json"));

        let message = agg.finish(3).to_message().unwrap();
        assert_eq!(message.title, "Failed to import d.qmod");
        assert_eq!(message.text, "Mod is missing mod.json");
        assert_eq!(message.detail, None);
    }

    #[test]
    fn test_single_unrecognized_names_extension() {
        let mut agg = FailureAggregator::new();
        agg.record(
            Path::new("c.xyz"),
            &ItemOutcome::Failed {
                error: ImportError::UnrecognizedType {
                    extension: Some("xyz".to_string()),
                },
            },
        );

        let message = agg.finish(1).to_message().unwrap();
        assert_eq!(message.text, "Unrecognised file type .xyz");
    }

    #[test]
    fn test_single_unexpected_failure_carries_detail() {
        let mut agg = FailureAggregator::new();
        agg.record(
            Path::new("e.qmod"),
            &ItemOutcome::Failed {
                error: ImportError::Unexpected {
                    message: "disk full".to_string(),
                    detail: Some("Io(Os { code: 28 })".to_string()),
                },
            },
        );

        let message = agg.finish(1).to_message().unwrap();
        assert_eq!(message.text, "An unexpected error occurred while importing e.qmod");
        assert_eq!(message.detail.as_deref(), Some("Io(Os { code: 28 })"));
    }

    #[test]
    fn test_multiple_failures_are_summarized() {
        let mut agg = FailureAggregator::new();
        agg.record(Path::new("d.qmod"), &failed("broken d"));
        agg.record(Path::new("e.qmod"), &failed("broken e"));

        let report = agg.finish(5);
        assert_eq!(report.failure_count(), 2);
        let message = report.to_message().unwrap();
        assert_eq!(message.title, "Multiple imports failed");
        assert!(message.text.starts_with("2 out of 5 files failed"));
        assert_eq!(message.detail, None);
    }

    #[test]
    fn test_same_path_last_outcome_wins() {
        let mut agg = FailureAggregator::new();
        let path = Path::new("dup.qmod");

        agg.record(path, &failed("first"));
        agg.record(path, &failed("second"));
        assert_eq!(agg.len(), 1);

        match agg.finish(2) {
            FailureReport::Single { error, .. } => {
                assert_eq!(error, ImportError::Installation("second".to_string()));
            }
            other => panic!("expected single failure, got {:?}", other),
        }

        let mut agg = FailureAggregator::new();
        agg.record(path, &failed("first"));
        agg.record(path, &ItemOutcome::Abandoned);
        assert!(agg.is_empty());
    }

    #[test]
    fn test_busy_rejection_message() {
        let message = rejection_message(&ImportError::Busy {
            holder: Operation::Patching,
        });
        assert_eq!(message.title, "Import failed");
        assert!(message.text.contains("(patching)"));
    }
}
