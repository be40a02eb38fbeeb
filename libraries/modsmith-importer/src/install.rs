//! Package install decision
//!
//! A parsed package walks through a small state machine before anything is
//! installed:
//!
//! ```text
//! LoaderCheck ──mismatch──> RepatchPrompted
//!      │
//!      ▼
//! VersionCheck ──cancel──> VersionRejected
//!      │
//!      ▼
//!   Install ──> Done
//! ```
//!
//! Every path reaches a terminal state within one call; nothing is retried.

use crate::{HandledReason, ImportError, ItemOutcome};
use modsmith_core::{
    ChoiceRequest, InstalledApp, InstalledAppState, InteractiveUi, ModLoader, PackageManager,
    ParsedPackage,
};
use std::sync::Arc;
use tracing::{debug, info};

const REPATCH: usize = 0;
const ENABLE_NOW: usize = 0;

/// States of the install decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    LoaderCheck,
    VersionCheck(InstalledApp),
    Install,
    /// Loader mismatch prompt answered; `repatch` is true if the flow was opened
    RepatchPrompted { repatch: bool },
    VersionRejected,
    Done,
}

impl InstallState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstallState::RepatchPrompted { .. } | InstallState::VersionRejected | InstallState::Done
        )
    }
}

/// Drives a parsed package to a terminal state
pub struct PackageInstaller {
    packages: Arc<dyn PackageManager>,
    app: Arc<dyn InstalledAppState>,
    ui: Arc<dyn InteractiveUi>,
}

impl PackageInstaller {
    pub fn new(
        packages: Arc<dyn PackageManager>,
        app: Arc<dyn InstalledAppState>,
        ui: Arc<dyn InteractiveUi>,
    ) -> Self {
        Self { packages, app, ui }
    }

    /// Run the decision for `package` and map the terminal state to an outcome
    pub async fn run(&self, package: &ParsedPackage) -> ItemOutcome {
        let mut state = InstallState::LoaderCheck;
        while !state.is_terminal() {
            state = match self.step(state, package).await {
                Ok(next) => next,
                Err(error) => return ItemOutcome::Failed { error },
            };
        }

        match state {
            InstallState::RepatchPrompted { repatch: true } => ItemOutcome::Handled {
                reason: HandledReason::RepatchRequested,
            },
            InstallState::RepatchPrompted { repatch: false } => ItemOutcome::Handled {
                reason: HandledReason::RepatchDeclined,
            },
            InstallState::VersionRejected => ItemOutcome::Handled {
                reason: HandledReason::VersionDeclined,
            },
            _ => ItemOutcome::PackageInstalled {
                id: package.id.clone(),
            },
        }
    }

    async fn step(
        &self,
        state: InstallState,
        package: &ParsedPackage,
    ) -> Result<InstallState, ImportError> {
        match state {
            InstallState::LoaderCheck => Ok(self.check_loader(package).await),
            InstallState::VersionCheck(installed) => Ok(self.check_version(package, &installed).await),
            InstallState::Install => {
                self.packages.install(package).await?;
                self.packages.save().await?;
                info!("Installed {} v{}", package.name, package.version);
                Ok(InstallState::Done)
            }
            terminal => Ok(terminal),
        }
    }

    async fn check_loader(&self, package: &ParsedPackage) -> InstallState {
        let installed = self.app.installed_app();
        let installed_loader = installed.as_ref().and_then(|app| app.loader);

        match installed {
            Some(app) if installed_loader == Some(package.loader) => InstallState::VersionCheck(app),
            _ => {
                debug!(
                    "{} needs {}, installed loader is {:?}",
                    package.id, package.loader, installed_loader
                );
                let choice = self
                    .ui
                    .present_choice(loader_mismatch_request(package, installed_loader))
                    .await;

                let repatch = choice == Some(REPATCH);
                if repatch {
                    self.ui.open_repatch_flow(package.loader);
                }
                InstallState::RepatchPrompted { repatch }
            }
        }
    }

    async fn check_version(&self, package: &ParsedPackage, installed: &InstalledApp) -> InstallState {
        if !package.targets_other_version(&installed.version) {
            return InstallState::Install;
        }

        let choice = self
            .ui
            .present_choice(version_mismatch_request(package, installed))
            .await;

        if choice == Some(ENABLE_NOW) {
            InstallState::Install
        } else {
            debug!("Install of outdated {} cancelled", package.id);
            InstallState::VersionRejected
        }
    }
}

fn loader_mismatch_request(package: &ParsedPackage, installed: Option<ModLoader>) -> ChoiceRequest {
    let text = match installed {
        Some(current) => format!(
            "{} requires {}, but the app is patched with {}. Repatch with {} to use this mod.",
            package.name, package.loader, current, package.loader
        ),
        None => format!(
            "{} requires {}, but the app is not patched with a mod loader. Patch with {} to use this mod.",
            package.name, package.loader, package.loader
        ),
    };

    ChoiceRequest::new(
        "Mod loader mismatch",
        text,
        vec!["Repatch".to_string(), "Not now".to_string()],
    )
}

fn version_mismatch_request(package: &ParsedPackage, installed: &InstalledApp) -> ChoiceRequest {
    ChoiceRequest::new(
        "Outdated mod",
        format!(
            "{} is designed for version {}, but version {} is installed. It may not work correctly.",
            package.name,
            package.package_version.as_deref().unwrap_or("unknown"),
            installed.version
        ),
        vec!["Enable now".to_string(), "Cancel".to_string()],
    )
}
