//! Copying asset files into their destination directory

use async_trait::async_trait;
use modsmith_core::{AssetCopier, ModsmithError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Copies assets into a single directory, keeping existing files
#[derive(Debug, Clone)]
pub struct DirectoryCopier {
    destination: PathBuf,
}

impl DirectoryCopier {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

#[async_trait]
impl AssetCopier for DirectoryCopier {
    async fn copy(&self, path: &Path) -> Result<()> {
        let dest = copy_to_directory(path, &self.destination)?;
        debug!("Copied {} to {}", path.display(), dest.display());
        Ok(())
    }
}

/// Copy a file into `destination`, returning where it landed
///
/// An existing file of the same name is never overwritten; the copy gets a
/// numeric suffix instead.
pub fn copy_to_directory(source_path: &Path, destination: &Path) -> Result<PathBuf> {
    if !source_path.is_file() {
        return Err(ModsmithError::installation(format!(
            "File not found: {}",
            source_path.display()
        )));
    }

    if !destination.exists() {
        fs::create_dir_all(destination)?;
    }

    let filename = source_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(sanitize_filename_part)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            ModsmithError::invalid_input(format!(
                "Invalid file name: {}",
                source_path.display()
            ))
        })?;

    let mut dest_path = destination.join(&filename);
    if dest_path.exists() {
        dest_path = resolve_filename_conflict(destination, &filename)?;
    }

    fs::copy(source_path, &dest_path)?;

    Ok(dest_path)
}

/// Replace characters that are invalid on common filesystems
pub fn sanitize_filename_part(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// "hat.png" -> "hat-1.png" -> "hat-2.png"
fn resolve_filename_conflict(directory: &Path, original_filename: &str) -> Result<PathBuf> {
    let path = Path::new(original_filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ModsmithError::invalid_input("Invalid filename"))?;
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    for counter in 1..1000 {
        let new_filename = if extension.is_empty() {
            format!("{}-{}", stem, counter)
        } else {
            format!("{}-{}.{}", stem, counter, extension)
        };

        let new_path = directory.join(&new_filename);
        if !new_path.exists() {
            return Ok(new_path);
        }
    }

    Err(ModsmithError::other(
        "Could not resolve filename conflict after 1000 attempts",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_part() {
        assert_eq!(sanitize_filename_part("Normal Name"), "Normal Name");
        assert_eq!(sanitize_filename_part("Top: Hat"), "Top_ Hat");
        assert_eq!(sanitize_filename_part("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename_part("  padded  "), "padded");
    }

    #[test]
    fn test_resolve_filename_conflict() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hat-1.png"), b"x").unwrap();

        let resolved = resolve_filename_conflict(dir.path(), "hat.png").unwrap();
        assert_eq!(resolved, dir.path().join("hat-2.png"));

        let resolved = resolve_filename_conflict(dir.path(), "README").unwrap();
        assert_eq!(resolved, dir.path().join("README-1"));
    }
}
