//! `.qmod` package store
//!
//! A qmod is a zip archive with a `mod.json` manifest at its root. Installing
//! one extracts the archive into `<mods_dir>/<id>/`; the set of installed mods
//! is persisted as JSON in the state file on save.

use async_trait::async_trait;
use modsmith_core::{extension_of, ModLoader, ModsmithError, PackageManager, ParsedPackage, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub const QMOD_EXTENSION: &str = "qmod";
pub const MANIFEST_NAME: &str = "mod.json";

/// The fields of `mod.json` we care about
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub package_version: Option<String>,
    /// Absent in older mods, which all targeted QuestLoader
    #[serde(default, rename = "modloader")]
    pub mod_loader: Option<String>,
}

/// A mod recorded in the state file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledMod {
    pub id: String,
    pub name: String,
    pub version: String,
    pub loader: ModLoader,
    pub package_version: Option<String>,
}

pub struct QmodStore {
    mods_dir: PathBuf,
    state_file: PathBuf,
    mods: Mutex<BTreeMap<String, InstalledMod>>,
}

impl QmodStore {
    /// Open the store, loading previously saved mods if the state file exists
    pub fn open(mods_dir: impl Into<PathBuf>, state_file: impl Into<PathBuf>) -> Result<Self> {
        let state_file = state_file.into();

        let mods = if state_file.exists() {
            let bytes = fs::read(&state_file)?;
            let saved: Vec<InstalledMod> = serde_json::from_slice(&bytes)?;
            debug!("Loaded {} mods from {}", saved.len(), state_file.display());
            saved.into_iter().map(|m| (m.id.clone(), m)).collect()
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            mods_dir: mods_dir.into(),
            state_file,
            mods: Mutex::new(mods),
        })
    }

    pub fn installed_mods(&self) -> Vec<InstalledMod> {
        self.mods().values().cloned().collect()
    }

    pub fn mod_dir(&self, id: &str) -> PathBuf {
        self.mods_dir.join(id)
    }

    fn mods(&self) -> MutexGuard<'_, BTreeMap<String, InstalledMod>> {
        self.mods.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PackageManager for QmodStore {
    async fn try_parse(&self, path: &Path) -> Result<Option<ParsedPackage>> {
        if extension_of(path).as_deref() != Some(QMOD_EXTENSION) {
            return Ok(None);
        }

        let manifest = read_manifest(path)?;
        if !is_valid_mod_id(&manifest.id) {
            return Err(ModsmithError::installation(format!(
                "{} has an invalid mod id: {:?}",
                file_label(path),
                manifest.id
            )));
        }
        let loader = match &manifest.mod_loader {
            Some(name) => name.parse::<ModLoader>().map_err(|_| {
                ModsmithError::installation(format!(
                    "{} targets an unknown mod loader: {}",
                    manifest.id, name
                ))
            })?,
            None => ModLoader::QuestLoader,
        };

        Ok(Some(ParsedPackage {
            id: manifest.id,
            name: manifest.name,
            version: manifest.version,
            loader,
            package_version: manifest.package_version,
            source_path: path.to_path_buf(),
        }))
    }

    async fn install(&self, package: &ParsedPackage) -> Result<()> {
        if !is_valid_mod_id(&package.id) {
            return Err(ModsmithError::installation(format!(
                "Invalid mod id: {:?}",
                package.id
            )));
        }

        // Extract next to the destination so a failed install leaves the
        // previous version untouched
        fs::create_dir_all(&self.mods_dir)?;
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&self.mods_dir)?;

        extract_archive(&package.source_path, staging.path()).map_err(|e| {
            ModsmithError::installation(format!("Failed to install {}: {}", package.name, e))
        })?;

        let dest = self.mod_dir(&package.id);
        if dest.exists() {
            fs::remove_dir_all(&dest)?;
        }
        fs::rename(staging.path(), &dest)?;

        self.mods().insert(
            package.id.clone(),
            InstalledMod {
                id: package.id.clone(),
                name: package.name.clone(),
                version: package.version.clone(),
                loader: package.loader,
                package_version: package.package_version.clone(),
            },
        );

        info!("Extracted {} v{} to {}", package.id, package.version, dest.display());
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let mods = self.installed_mods();

        if let Some(parent) = self.state_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.state_file, serde_json::to_vec_pretty(&mods)?)?;

        debug!("Saved {} mods to {}", mods.len(), self.state_file.display());
        Ok(())
    }

    fn supported_extensions(&self) -> Vec<String> {
        vec![QMOD_EXTENSION.to_string()]
    }
}

/// A mod id must name exactly one directory below the mods directory
fn is_valid_mod_id(id: &str) -> bool {
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn open_archive(path: &Path) -> Result<zip::ZipArchive<fs::File>> {
    let file = fs::File::open(path).map_err(|e| {
        ModsmithError::installation(format!("Failed to open {}: {}", file_label(path), e))
    })?;

    zip::ZipArchive::new(file).map_err(|e| {
        ModsmithError::installation(format!(
            "{} is not a valid qmod archive: {}",
            file_label(path),
            e
        ))
    })
}

/// Read and parse `mod.json` from a qmod archive
pub fn read_manifest(path: &Path) -> Result<ModManifest> {
    let mut archive = open_archive(path)?;

    let mut contents = String::new();
    {
        let mut entry = archive.by_name(MANIFEST_NAME).map_err(|_| {
            ModsmithError::installation(format!(
                "{} does not contain a {}",
                file_label(path),
                MANIFEST_NAME
            ))
        })?;
        entry.read_to_string(&mut contents)?;
    }

    serde_json::from_str(&contents).map_err(|e| {
        ModsmithError::installation(format!(
            "Invalid {} in {}: {}",
            MANIFEST_NAME,
            file_label(path),
            e
        ))
    })
}

/// Extract every entry of the archive below `dest`
///
/// Entries whose names would escape `dest` are skipped.
fn extract_archive(path: &Path, dest: &Path) -> Result<()> {
    let mut archive = open_archive(path)?;
    fs::create_dir_all(dest)?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| ModsmithError::installation(format!("Corrupt archive entry: {}", e)))?;
        let Some(out_path) = file.enclosed_name() else {
            continue;
        };

        let out_path = dest.join(out_path);
        if file.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out_file = fs::File::create(&out_path)?;
        std::io::copy(&mut file, &mut out_file)?;
    }

    Ok(())
}
