//! Import orchestration - owns the queue and the drain loop
//!
//! Every submission funnels into [`ImportController::submit`]. The first
//! submission acquires the operation lock and drains the queue; submissions
//! arriving while that drain is suspended (waiting on a dialog, a parse or an
//! install) are appended to the same queue and processed by the same loop.

use crate::aggregator::{rejection_message, FailureAggregator};
use crate::classifier::{Classification, Classifier};
use crate::install::PackageInstaller;
use crate::queue::{DrainSlot, Offer};
use crate::resolver::AmbiguityResolver;
use crate::{ImportError, ImportEvent, ImportItem, ImportOutcome, ImportSummary, ItemOutcome};
use modsmith_core::{
    normalize_extension, AssetRegistry, AssetType, InstalledAppState, InteractiveUi, Operation,
    OperationLock, PackageManager,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// External capabilities the importer calls into
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn AssetRegistry>,
    pub packages: Arc<dyn PackageManager>,
    pub app: Arc<dyn InstalledAppState>,
    pub ui: Arc<dyn InteractiveUi>,
}

/// Session-scoped import controller
pub struct ImportController {
    lock: Arc<OperationLock>,
    registry: Arc<dyn AssetRegistry>,
    packages: Arc<dyn PackageManager>,
    ui: Arc<dyn InteractiveUi>,
    classifier: Classifier,
    resolver: AmbiguityResolver,
    installer: PackageInstaller,
    slot: Mutex<DrainSlot>,
    events: Option<mpsc::UnboundedSender<ImportEvent>>,
}

impl ImportController {
    /// Create a controller sharing `lock` with the rest of the application
    pub fn new(collaborators: Collaborators, lock: Arc<OperationLock>) -> Self {
        let Collaborators {
            registry,
            packages,
            app,
            ui,
        } = collaborators;

        Self {
            lock,
            classifier: Classifier::new(Arc::clone(&packages), Arc::clone(&registry)),
            resolver: AmbiguityResolver::new(Arc::clone(&ui)),
            installer: PackageInstaller::new(Arc::clone(&packages), app, Arc::clone(&ui)),
            registry,
            packages,
            ui,
            slot: Mutex::new(DrainSlot::default()),
            events: None,
        }
    }

    /// Send progress events to `events`
    pub fn with_events(mut self, events: mpsc::UnboundedSender<ImportEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Import files of unknown type (general browse, drag & drop)
    pub async fn import_files(&self, paths: Vec<PathBuf>) -> ImportOutcome {
        self.submit(paths, None).await
    }

    /// Import files the caller expects to be `asset_type` (type-specific browse)
    pub async fn import_files_as(&self, paths: Vec<PathBuf>, asset_type: AssetType) -> ImportOutcome {
        self.submit(paths, Some(asset_type)).await
    }

    /// Queue `paths` and, unless a drain is already running, drain the queue
    ///
    /// Returns `Merged` immediately when a drain is running, `Rejected` when
    /// another operation holds the lock, and otherwise `Completed` once every
    /// queued item (including ones merged in meanwhile) has been processed.
    pub async fn submit(&self, paths: Vec<PathBuf>, hint: Option<AssetType>) -> ImportOutcome {
        let items: Vec<ImportItem> = paths
            .into_iter()
            .map(|path| ImportItem::new(path, hint.clone()))
            .collect();

        match self.offer(items) {
            Ok(Offer::Merged { queued }) => {
                debug!("Merged {} file(s) into the running import", queued);
                ImportOutcome::Merged { queued }
            }
            Ok(Offer::Opened { queued, id }) => {
                info!("Starting import of {} file(s)", queued);
                self.emit(ImportEvent::DrainStarted { queued });

                let summary = {
                    let _session = DrainSession { controller: self, id };
                    self.drain().await
                };
                if let Some(message) = summary.report.to_message() {
                    self.ui.show_message(message).await;
                }

                self.emit(ImportEvent::DrainFinished {
                    summary: summary.clone(),
                });
                ImportOutcome::Completed { summary }
            }
            Err(error) => {
                warn!("Import rejected: {}", error);
                self.ui.show_message(rejection_message(&error)).await;
                ImportOutcome::Rejected { error }
            }
        }
    }

    /// Whether a drain is currently running
    pub fn is_importing(&self) -> bool {
        self.slot().is_draining()
    }

    /// Every importable extension, for file picker filters
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut extensions: BTreeSet<String> = self
            .packages
            .supported_extensions()
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();

        for asset_type in self.registry.asset_types() {
            extensions.extend(asset_type.supported_extensions().iter().cloned());
        }

        extensions.into_iter().collect()
    }

    fn offer(&self, items: Vec<ImportItem>) -> Result<Offer, ImportError> {
        let mut slot = self.slot();
        let items = match slot.merge(items) {
            Ok(merged) => return Ok(merged),
            Err(items) => items,
        };

        let guard = self.lock.try_acquire(Operation::Importing)?;
        Ok(slot.open(items, guard))
    }

    fn next_item(&self) -> Option<ImportItem> {
        self.slot().next_item()
    }

    fn slot(&self) -> MutexGuard<'_, DrainSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn drain(&self) -> ImportSummary {
        let start_time = Instant::now();
        let mut failures = FailureAggregator::new();
        let mut summary = ImportSummary::default();

        while let Some(item) = self.next_item() {
            summary.processed += 1;
            info!("Importing {}", item.path().display());
            self.emit(ImportEvent::ItemStarted {
                path: item.path().to_path_buf(),
                index: summary.processed,
            });

            let outcome = self.process(&item).await;
            match &outcome {
                ItemOutcome::PackageInstalled { .. } | ItemOutcome::AssetCopied { .. } => {
                    summary.succeeded += 1;
                }
                ItemOutcome::Handled { .. } => summary.handled += 1,
                ItemOutcome::Abandoned => summary.abandoned += 1,
                ItemOutcome::Failed { .. } => summary.failed += 1,
            }
            failures.record(item.path(), &outcome);

            self.emit(ImportEvent::ItemFinished {
                path: item.path().to_path_buf(),
                outcome,
            });
        }

        summary.report = failures.finish(summary.processed);
        summary.duration = start_time.elapsed();
        info!("{}", summary.summary_text());
        summary
    }

    async fn process(&self, item: &ImportItem) -> ItemOutcome {
        let classification = match self
            .classifier
            .classify(item.path(), item.preferred_type())
            .await
        {
            Ok(classification) => classification,
            Err(error) => return error.into(),
        };

        match classification {
            Classification::Package(package) => self.installer.run(&package).await,
            Classification::Asset(asset_type) => copy_asset(item.path(), &asset_type).await,
            Classification::Ambiguous(candidates) => {
                match self.resolver.resolve(&candidates, item.path()).await {
                    Some(asset_type) => copy_asset(item.path(), &asset_type).await,
                    None => ItemOutcome::Abandoned,
                }
            }
            Classification::Unrecognized { extension } => {
                ImportError::UnrecognizedType { extension }.into()
            }
        }
    }

    fn emit(&self, event: ImportEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

/// Closes its drain if the owning `submit` future is dropped mid-drain
struct DrainSession<'a> {
    controller: &'a ImportController,
    id: u64,
}

impl Drop for DrainSession<'_> {
    fn drop(&mut self) {
        if let Some(dropped) = self.controller.slot().close(self.id) {
            warn!("Import interrupted, {} queued file(s) dropped", dropped);
        }
    }
}

async fn copy_asset(path: &Path, asset_type: &AssetType) -> ItemOutcome {
    match asset_type.perform_copy(path).await {
        Ok(()) => {
            info!(
                "Imported {} as {}",
                path.display(),
                asset_type.display_name_singular()
            );
            ItemOutcome::AssetCopied {
                asset_type: asset_type.id().to_string(),
            }
        }
        Err(err) => ImportError::from(err).into(),
    }
}
