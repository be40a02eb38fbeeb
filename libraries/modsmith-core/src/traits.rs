//! Collaborator traits the import subsystem calls into
use crate::error::Result;
use crate::types::{AssetType, ChoiceRequest, InstalledApp, Message, ModLoader, ParsedPackage};
use async_trait::async_trait;
use std::path::Path;

/// Registry of asset types
///
/// Entries are immutable; the importer only reads them.
pub trait AssetRegistry: Send + Sync {
    /// All asset types whose supported extensions contain `extension`
    ///
    /// `extension` is matched case-insensitively, with or without a leading dot.
    fn types_for_extension(&self, extension: &str) -> Vec<AssetType>;

    /// Every registered asset type, in registration order
    fn asset_types(&self) -> Vec<AssetType>;
}

/// Package parser and installer
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Try to parse `path` as a package
    ///
    /// Returns `Ok(None)` when the file is not a package at all.
    ///
    /// # Errors
    /// Returns an error when the file looks like a package but is broken
    async fn try_parse(&self, path: &Path) -> Result<Option<ParsedPackage>>;

    /// Install a previously parsed package
    async fn install(&self, package: &ParsedPackage) -> Result<()>;

    /// Persist the installed mod set
    async fn save(&self) -> Result<()>;

    /// Extensions this manager can parse, lowercase without the dot
    fn supported_extensions(&self) -> Vec<String>;
}

/// Read-only view of the installed application
pub trait InstalledAppState: Send + Sync {
    /// The installed app, or `None` when nothing is installed
    fn installed_app(&self) -> Option<InstalledApp>;
}

/// Interactive user interface
#[async_trait]
pub trait InteractiveUi: Send + Sync {
    /// Present a modal choice and wait for the user
    ///
    /// Returns the index of the chosen option, or `None` if the user
    /// cancelled or closed the dialog.
    async fn present_choice(&self, request: ChoiceRequest) -> Option<usize>;

    /// Show an informational message and wait for it to be dismissed
    async fn show_message(&self, message: Message);

    /// Open the repatch flow preselecting `loader`
    ///
    /// Fire-and-forget: the caller does not observe the outcome.
    fn open_repatch_flow(&self, loader: ModLoader);
}
