//! In-memory asset type registry

use modsmith_core::{normalize_extension, AssetRegistry, AssetType};

/// Asset types registered at startup, kept in registration order
#[derive(Debug, Default, Clone)]
pub struct InMemoryAssetRegistry {
    types: Vec<AssetType>,
}

impl InMemoryAssetRegistry {
    pub fn new(types: Vec<AssetType>) -> Self {
        Self { types }
    }

    /// Register an asset type, replacing any with the same id
    pub fn register(&mut self, asset_type: AssetType) {
        match self.types.iter().position(|t| t.id() == asset_type.id()) {
            Some(index) => self.types[index] = asset_type,
            None => self.types.push(asset_type),
        }
    }

    /// Look up an asset type by id
    pub fn get(&self, id: &str) -> Option<&AssetType> {
        self.types.iter().find(|t| t.id() == id)
    }
}

impl AssetRegistry for InMemoryAssetRegistry {
    fn types_for_extension(&self, extension: &str) -> Vec<AssetType> {
        let extension = normalize_extension(extension);
        self.types
            .iter()
            .filter(|t| t.supports_extension(&extension))
            .cloned()
            .collect()
    }

    fn asset_types(&self) -> Vec<AssetType> {
        self.types.clone()
    }
}
