//! Asset types: kinds of non-package files that can be copied into the game

use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Copy action backing an asset type
///
/// Implementers place the file wherever the asset type lives (cosmetics
/// folder, playlist folder, ...).
#[async_trait]
pub trait AssetCopier: Send + Sync {
    /// Copy the file at `path` into the managed location
    ///
    /// # Errors
    /// Returns `ModsmithError::Installation` for failures the user can act on
    async fn copy(&self, path: &Path) -> Result<()>;
}

/// A registered kind of asset, identified by its supported extensions
///
/// Two asset types are equal when their ids are equal.
#[derive(Clone)]
pub struct AssetType {
    id: String,
    singular: String,
    plural: String,
    extensions: BTreeSet<String>,
    copier: Arc<dyn AssetCopier>,
}

impl AssetType {
    /// Create an asset type
    ///
    /// Extensions may be given with or without a leading dot and in any case.
    pub fn new<I, S>(
        id: impl Into<String>,
        singular: impl Into<String>,
        plural: impl Into<String>,
        extensions: I,
        copier: Arc<dyn AssetCopier>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.into(),
            singular: singular.into(),
            plural: plural.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| !ext.is_empty())
                .collect(),
            copier,
        }
    }

    /// Stable identifier (e.g. `hat`)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of a single file of this type (e.g. "Hat")
    pub fn display_name_singular(&self) -> &str {
        &self.singular
    }

    /// Name of several files of this type (e.g. "Hats")
    pub fn display_name_plural(&self) -> &str {
        &self.plural
    }

    /// Lowercase extensions without the leading dot
    pub fn supported_extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    /// Case-insensitive extension check
    pub fn supports_extension(&self, extension: &str) -> bool {
        self.extensions.contains(&normalize_extension(extension))
    }

    /// Run the copy action for `path`
    ///
    /// # Errors
    /// Propagates whatever the copier reports
    pub async fn perform_copy(&self, path: &Path) -> Result<()> {
        self.copier.copy(path).await
    }
}

impl PartialEq for AssetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AssetType {}

impl fmt::Debug for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetType")
            .field("id", &self.id)
            .field("singular", &self.singular)
            .field("plural", &self.plural)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

/// Lowercase an extension and strip any leading dots
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// Normalized extension of `path`, if it has one
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
        .filter(|ext| !ext.is_empty())
}
