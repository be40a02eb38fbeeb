//! Application wiring
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::mods::QmodStore;
use modsmith_core::{AssetType, InteractiveUi, OperationLock};
use modsmith_importer::{Collaborators, ImportController, ImportOutcome, InMemoryAssetRegistry};
use std::path::PathBuf;
use std::sync::Arc;

pub struct Application {
    pub controller: ImportController,
    pub store: Arc<QmodStore>,
    pub registry: InMemoryAssetRegistry,
    pub lock: Arc<OperationLock>,
}

impl Application {
    /// Build the importer and its collaborators from a validated config
    pub fn new(config: &AppConfig, ui: Arc<dyn InteractiveUi>) -> Result<Self> {
        let store = Arc::new(QmodStore::open(
            &config.storage.mods_dir,
            &config.storage.state_file,
        )?);
        let registry = config.asset_registry();
        let lock = Arc::new(OperationLock::new());

        let controller = ImportController::new(
            Collaborators {
                registry: Arc::new(registry.clone()),
                packages: store.clone(),
                app: Arc::new(config.app.clone()),
                ui,
            },
            Arc::clone(&lock),
        );

        Ok(Self {
            controller,
            store,
            registry,
            lock,
        })
    }

    pub fn asset_type(&self, id: &str) -> Result<AssetType> {
        self.registry
            .get(id)
            .cloned()
            .ok_or_else(|| CliError::UnknownAssetType(id.to_string()))
    }

    /// Import `paths`, forced to `asset_type` when given
    pub async fn import(&self, paths: Vec<PathBuf>, asset_type: Option<&str>) -> Result<ImportOutcome> {
        let outcome = match asset_type {
            Some(id) => {
                let asset_type = self.asset_type(id)?;
                self.controller.import_files_as(paths, asset_type).await
            }
            None => self.controller.import_files(paths).await,
        };
        Ok(outcome)
    }
}
