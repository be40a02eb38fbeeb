//! Interactive choice between several matching asset types

use modsmith_core::{AssetType, ChoiceRequest, InteractiveUi};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Asks the user which asset type an ambiguous file should be imported as
pub struct AmbiguityResolver {
    ui: Arc<dyn InteractiveUi>,
}

impl AmbiguityResolver {
    pub fn new(ui: Arc<dyn InteractiveUi>) -> Self {
        Self { ui }
    }

    /// Returns the chosen type, or `None` if the user cancelled
    pub async fn resolve(&self, candidates: &[AssetType], path: &Path) -> Option<AssetType> {
        let request = choice_request(candidates, path);
        let choice = self.ui.present_choice(request).await;

        match choice {
            Some(index) => {
                let chosen = candidates.get(index).cloned();
                if chosen.is_none() {
                    warn!("Ignoring out of range asset type choice {}", index);
                }
                chosen
            }
            None => {
                debug!("Asset type choice for {} cancelled", path.display());
                None
            }
        }
    }
}

fn choice_request(candidates: &[AssetType], path: &Path) -> ChoiceRequest {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    ChoiceRequest::new(
        "Multiple import options",
        format!(
            "{} can be imported as multiple types of file. Please select what you would like to import it as.",
            file_name
        ),
        candidates
            .iter()
            .map(|t| t.display_name_singular().to_string())
            .collect(),
    )
}
