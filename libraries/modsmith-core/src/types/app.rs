//! Installed application state

use crate::types::ModLoader;
use serde::{Deserialize, Serialize};

/// The application currently installed on the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    /// Application version string
    pub version: String,

    /// Loader the app was patched with; `None` for an unpatched app
    pub loader: Option<ModLoader>,
}

impl InstalledApp {
    /// Create a new installed app record
    pub fn new(version: impl Into<String>, loader: Option<ModLoader>) -> Self {
        Self {
            version: version.into(),
            loader,
        }
    }
}
