//! Parsed packages and the mod loaders they target

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ModsmithError;

/// Mod loader a package is built against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModLoader {
    /// The legacy loader
    QuestLoader,
    /// The current loader
    Scotland2,
}

impl fmt::Display for ModLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModLoader::QuestLoader => write!(f, "QuestLoader"),
            ModLoader::Scotland2 => write!(f, "Scotland2"),
        }
    }
}

impl FromStr for ModLoader {
    type Err = ModsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "questloader" => Ok(ModLoader::QuestLoader),
            "scotland2" => Ok(ModLoader::Scotland2),
            other => Err(ModsmithError::invalid_input(format!(
                "Unknown mod loader: {}",
                other
            ))),
        }
    }
}

/// A package that was successfully parsed from a file
///
/// Installation goes through the `PackageManager` that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPackage {
    /// Package identifier
    pub id: String,

    /// Human readable name
    pub name: String,

    /// Version of the package itself
    pub version: String,

    /// Loader the package requires
    pub loader: ModLoader,

    /// Application version the package targets, if it declares one
    pub package_version: Option<String>,

    /// File the package was parsed from
    pub source_path: PathBuf,
}

impl ParsedPackage {
    /// Whether the declared target version differs from `installed_version`
    ///
    /// Packages that declare no target version never mismatch.
    pub fn targets_other_version(&self, installed_version: &str) -> bool {
        self.package_version
            .as_deref()
            .is_some_and(|target| target != installed_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(target: Option<&str>) -> ParsedPackage {
        ParsedPackage {
            id: "songloader".to_string(),
            name: "SongLoader".to_string(),
            version: "1.0.0".to_string(),
            loader: ModLoader::Scotland2,
            package_version: target.map(str::to_string),
            source_path: PathBuf::from("/mods/songloader.qmod"),
        }
    }

    #[test]
    fn test_loader_from_str_is_case_insensitive() {
        assert_eq!("Scotland2".parse::<ModLoader>().unwrap(), ModLoader::Scotland2);
        assert_eq!("QUESTLOADER".parse::<ModLoader>().unwrap(), ModLoader::QuestLoader);
        assert!("bmbf".parse::<ModLoader>().is_err());
    }

    #[test]
    fn test_version_mismatch() {
        assert!(package(Some("1.35.0")).targets_other_version("1.37.0"));
        assert!(!package(Some("1.37.0")).targets_other_version("1.37.0"));
        assert!(!package(None).targets_other_version("1.37.0"));
    }
}
