// ABOUTME: Utility functions for the carousel-block crate
// ABOUTME: Provides path validation and directory helpers used by page generation and watch mode

use crate::errors::{CarouselError, Result};
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CarouselError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(CarouselError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(CarouselError::FileReadError)?;
    } else if !path.is_dir() {
        return Err(CarouselError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory_exists(parent)?;
        }
    }
    Ok(())
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        CarouselError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_exists() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let file = dir.path().join("block.html");
        std::fs::write(&file, "<ul><li>A</li></ul>").expect("Failed to write file");

        assert!(validate_file_exists(&file).is_ok());
        assert!(matches!(
            validate_file_exists(&dir.path().join("missing.html")),
            Err(CarouselError::PathNotFoundError(_))
        ));
        assert!(matches!(
            validate_file_exists(dir.path()),
            Err(CarouselError::ValidationError(_))
        ));
    }

    #[test]
    fn test_ensure_parent_directory_exists_creates_nested() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let file = dir.path().join("a").join("b").join("page.html");

        ensure_parent_directory_exists(&file).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }
}
