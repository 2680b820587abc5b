use crate::error::AppError;
use std::path::{Path, PathBuf};

/// Names of the subfolders of `root` that hold at least `min_image_count`
/// files, in directory enumeration order, capped at `max_classes` entries.
///
/// Enumeration order is whatever the filesystem yields; the caller gets it
/// untouched. Enumeration stops as soon as the class cap is reached.
pub fn select_class_folders(
    root: &Path,
    min_image_count: usize,
    max_classes: usize,
) -> Result<Vec<String>, AppError> {
    let read_dir = std::fs::read_dir(root).map_err(|e| AppError {
        message: format!("Cannot read directory {}: {}", root.display(), e),
    })?;

    let mut folders = Vec::new();

    for entry in read_dir {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        if list_files(&entry.path())?.len() >= min_image_count {
            folders.push(entry.file_name().to_string_lossy().to_string());
            if folders.len() == max_classes {
                break;
            }
        }
    }

    Ok(folders)
}

/// Regular files directly inside `dir`, in enumeration order.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| AppError {
        message: format!("Cannot read directory {}: {}", dir.display(), e),
    })?;

    let mut files = Vec::new();

    for entry in read_dir {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }

    Ok(files)
}
