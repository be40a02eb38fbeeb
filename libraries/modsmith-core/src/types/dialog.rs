//! Request/response types for interactive dialogs

use serde::{Deserialize, Serialize};

/// A modal choice presented to the user
///
/// There is never a default-accept action: the response is either the index
/// of an option the user explicitly picked, or `None` when cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    /// Dialog title
    pub title: String,

    /// Body text
    pub text: String,

    /// Labels of the selectable options, in display order
    pub options: Vec<String>,

    /// Whether the dialog can be closed without choosing
    pub allow_cancel: bool,
}

impl ChoiceRequest {
    /// Create a cancellable choice
    pub fn new(title: impl Into<String>, text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            options,
            allow_cancel: true,
        }
    }

    /// Label of the option at `index`
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

/// An informational dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Dialog title
    pub title: String,

    /// Body text
    pub text: String,

    /// Diagnostic detail (error chain), shown in an expandable section
    pub detail: Option<String>,
}

impl Message {
    /// Create a message without detail
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            detail: None,
        }
    }

    /// Attach diagnostic detail
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
