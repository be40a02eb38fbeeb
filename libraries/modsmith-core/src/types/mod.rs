//! Domain types shared across Modsmith crates

mod app;
mod asset;
mod dialog;
mod package;

pub use app::InstalledApp;
pub use asset::{extension_of, normalize_extension, AssetCopier, AssetType};
pub use dialog::{ChoiceRequest, Message};
pub use package::{ModLoader, ParsedPackage};
