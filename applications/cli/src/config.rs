//! Application configuration
use crate::copy::DirectoryCopier;
use crate::error::{CliError, Result};
use modsmith_core::{AssetType, InstalledApp, InstalledAppState, ModLoader};
use modsmith_importer::InMemoryAssetRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default configuration file, read from the working directory if present
pub const DEFAULT_CONFIG_FILE: &str = "modsmith.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_asset_types")]
    pub asset_types: Vec<AssetTypeSettings>,
}

/// The installed application; no version means nothing is installed
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppSettings {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub loader: Option<ModLoader>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_mods_dir")]
    pub mods_dir: PathBuf,

    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetTypeSettings {
    pub id: String,
    pub singular: String,
    pub plural: String,
    pub extensions: Vec<String>,
    pub destination: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `modsmith.toml`; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (e.g. MODSMITH_APP__VERSION)
        settings = settings.add_source(
            config::Environment::with_prefix("MODSMITH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.loader.is_some() && self.app.version.is_none() {
            return Err(CliError::Config(
                "app.loader is set but app.version is missing".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        for asset_type in &self.asset_types {
            if !ids.insert(asset_type.id.as_str()) {
                return Err(CliError::Config(format!(
                    "Duplicate asset type id: {}",
                    asset_type.id
                )));
            }
            if asset_type.extensions.iter().all(|ext| ext.trim_matches('.').is_empty()) {
                return Err(CliError::Config(format!(
                    "Asset type {} has no extensions",
                    asset_type.id
                )));
            }
        }

        Ok(())
    }

    /// Build the asset registry, each type copying into its destination
    pub fn asset_registry(&self) -> InMemoryAssetRegistry {
        let mut registry = InMemoryAssetRegistry::default();
        for settings in &self.asset_types {
            registry.register(AssetType::new(
                settings.id.clone(),
                settings.singular.clone(),
                settings.plural.clone(),
                &settings.extensions,
                Arc::new(DirectoryCopier::new(settings.destination.clone())),
            ));
        }
        registry
    }
}

impl InstalledAppState for AppSettings {
    fn installed_app(&self) -> Option<InstalledApp> {
        self.version
            .as_ref()
            .map(|version| InstalledApp::new(version.clone(), self.loader))
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        mods_dir: default_mods_dir(),
        state_file: default_state_file(),
    }
}

fn default_mods_dir() -> PathBuf {
    PathBuf::from("./data/mods")
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./data/mods.json")
}

fn asset_type(id: &str, singular: &str, plural: &str, extensions: &[&str]) -> AssetTypeSettings {
    AssetTypeSettings {
        id: id.to_string(),
        singular: singular.to_string(),
        plural: plural.to_string(),
        extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        destination: PathBuf::from("./data/assets").join(plural.to_lowercase()),
    }
}

fn default_asset_types() -> Vec<AssetTypeSettings> {
    vec![
        asset_type("hat", "Hat", "Hats", &["hat", "png"]),
        asset_type("saber", "Saber", "Sabers", &["saber", "png"]),
        asset_type("note", "Note", "Notes", &["bloq"]),
        asset_type("wall", "Wall", "Walls", &["wall"]),
        asset_type("playlist", "Playlist", "Playlists", &["bplist", "json"]),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            storage: default_storage(),
            asset_types: default_asset_types(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modsmith_core::AssetRegistry;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert!(config.app.installed_app().is_none());
    }

    #[test]
    fn test_duplicate_asset_ids_rejected() {
        let mut config = AppConfig::default();
        config.asset_types.push(asset_type("hat", "Cap", "Caps", &["cap"]));
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_asset_type_without_extensions_rejected() {
        let mut config = AppConfig::default();
        config.asset_types.push(asset_type("empty", "Empty", "Empties", &["."]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_loader_without_version_rejected() {
        let mut config = AppConfig::default();
        config.app.loader = Some(ModLoader::Scotland2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_registry_matches_default_png_twice() {
        let registry = AppConfig::default().asset_registry();
        let ids: Vec<String> = registry
            .types_for_extension("PNG")
            .iter()
            .map(|t| t.id().to_string())
            .collect();
        assert_eq!(ids, vec!["hat", "saber"]);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[app]
version = "1.37.0"
loader = "scotland2"

[storage]
mods_dir = "/tmp/mods"

[[asset_types]]
id = "hat"
singular = "Hat"
plural = "Hats"
extensions = ["hat"]
destination = "/tmp/hats"
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        config.validate().unwrap();

        assert_eq!(
            config.app.installed_app(),
            Some(InstalledApp::new("1.37.0", Some(ModLoader::Scotland2)))
        );
        assert_eq!(config.storage.mods_dir, PathBuf::from("/tmp/mods"));
        assert_eq!(config.storage.state_file, default_state_file());
        assert_eq!(config.asset_types.len(), 1);
    }
}
