//! Error types for the importer

use modsmith_core::{LockBusy, ModsmithError, Operation};
use serde::Serialize;
use thiserror::Error;

/// Why a submission or a single file failed to import
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportError {
    /// The operation lock was held by something else when the batch arrived
    #[error("Another operation ({holder}) is in progress")]
    Busy { holder: Operation },

    /// Not a package, and no asset type supports the extension
    #[error("Unrecognised file type {}", display_extension(.extension))]
    UnrecognizedType { extension: Option<String> },

    /// Domain failure from the parser, copy, install or save step
    #[error("{0}")]
    Installation(String),

    /// Anything else
    #[error("{message}")]
    Unexpected {
        message: String,
        detail: Option<String>,
    },
}

/// Tag for each `ImportError` variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Busy,
    UnrecognizedType,
    Installation,
    Unexpected,
}

impl ImportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ImportError::Busy { .. } => FailureKind::Busy,
            ImportError::UnrecognizedType { .. } => FailureKind::UnrecognizedType,
            ImportError::Installation(_) => FailureKind::Installation,
            ImportError::Unexpected { .. } => FailureKind::Unexpected,
        }
    }

    /// Diagnostic detail, only present for unexpected failures
    pub fn detail(&self) -> Option<&str> {
        match self {
            ImportError::Unexpected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Whether the message can be shown verbatim without diagnostics
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, ImportError::Unexpected { .. })
    }
}

impl From<ModsmithError> for ImportError {
    fn from(err: ModsmithError) -> Self {
        match err {
            ModsmithError::Installation(msg) => ImportError::Installation(msg),
            other => ImportError::Unexpected {
                message: other.to_string(),
                detail: Some(format!("{:?}", other)),
            },
        }
    }
}

impl From<LockBusy> for ImportError {
    fn from(busy: LockBusy) -> Self {
        ImportError::Busy {
            holder: busy.holder,
        }
    }
}

fn display_extension(extension: &Option<String>) -> String {
    match extension {
        Some(ext) => format!(".{}", ext),
        None => "(no extension)".to_string(),
    }
}
