//! File classification
//!
//! Decides whether a path is a package, one or more asset types, or nothing
//! we know how to import. Package parsing always wins over extension matching.

use crate::ImportError;
use modsmith_core::{extension_of, AssetRegistry, AssetType, PackageManager, ParsedPackage};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// What a file turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The package manager parsed it
    Package(ParsedPackage),
    /// Exactly one asset type applies
    Asset(AssetType),
    /// Two or more asset types apply; the user has to pick
    Ambiguous(Vec<AssetType>),
    /// No package and no asset type
    Unrecognized { extension: Option<String> },
}

/// Classifies files against the package manager and asset registry
pub struct Classifier {
    packages: Arc<dyn PackageManager>,
    registry: Arc<dyn AssetRegistry>,
}

impl Classifier {
    pub fn new(packages: Arc<dyn PackageManager>, registry: Arc<dyn AssetRegistry>) -> Self {
        Self { packages, registry }
    }

    /// Classify `path`, honouring `hint` when it supports the extension
    ///
    /// # Errors
    /// Returns the package manager's error when the file looks like a package
    /// but cannot be parsed
    pub async fn classify(
        &self,
        path: &Path,
        hint: Option<&AssetType>,
    ) -> Result<Classification, ImportError> {
        if let Some(package) = self.packages.try_parse(path).await? {
            debug!("{} is package {} ({})", path.display(), package.id, package.loader);
            return Ok(Classification::Package(package));
        }

        let Some(extension) = extension_of(path) else {
            return Ok(Classification::Unrecognized { extension: None });
        };

        if let Some(hint) = hint.filter(|h| h.supports_extension(&extension)) {
            debug!("{} imported as preferred type {}", path.display(), hint.id());
            return Ok(Classification::Asset(hint.clone()));
        }

        let mut candidates = self.registry.types_for_extension(&extension);
        debug!(
            "{} matches {} asset type(s) for .{}",
            path.display(),
            candidates.len(),
            extension
        );

        Ok(match candidates.len() {
            0 => Classification::Unrecognized {
                extension: Some(extension),
            },
            1 => Classification::Asset(candidates.remove(0)),
            _ => Classification::Ambiguous(candidates),
        })
    }
}
