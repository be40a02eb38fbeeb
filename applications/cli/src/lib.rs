//! Modsmith command line
//!
//! Wires the importer to the filesystem: qmod packages extract into a mods
//! directory, assets copy into per-type directories and dialogs run in the
//! terminal.
//!
//! This library exposes the components for testing purposes.

pub mod app;
pub mod config;
pub mod copy;
pub mod error;
pub mod mods;
pub mod terminal;

pub use app::Application;
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use mods::{InstalledMod, QmodStore};
pub use terminal::TerminalUi;
