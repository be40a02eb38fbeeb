//! Modsmith Core
//!
//! Platform-agnostic types, collaborator traits, and the process-wide
//! operation lock shared by every Modsmith crate.
//!
//! # Architecture
//!
//! - **Domain Types**: `AssetType`, `ParsedPackage`, `InstalledApp`, `ModLoader`
//! - **Collaborator Traits**: `AssetRegistry`, `PackageManager`,
//!   `InstalledAppState`, `InteractiveUi`
//! - **Operation Lock**: `OperationLock` serializing patch, install, uninstall
//!   and import operations
//! - **Error Handling**: `ModsmithError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use modsmith_core::{Operation, OperationLock};
//! use std::sync::Arc;
//!
//! let lock = Arc::new(OperationLock::new());
//! let guard = lock.try_acquire(Operation::Patching).unwrap();
//! assert!(lock.try_acquire(Operation::Importing).is_err());
//! drop(guard);
//! assert!(lock.is_free());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod lock;
pub mod traits;
pub mod types;

pub use error::{ModsmithError, Result};
pub use lock::{LockBusy, Operation, OperationGuard, OperationLock};
pub use traits::{AssetRegistry, InstalledAppState, InteractiveUi, PackageManager};
pub use types::{
    extension_of, normalize_extension, AssetCopier, AssetType, ChoiceRequest, InstalledApp,
    Message, ModLoader, ParsedPackage,
};
