use crate::error::CurateError;
use image::RgbImage;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the frame store will load; everything else is ignored.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Immediate subdirectories of the dataset root, one per category,
/// lexicographically sorted.
pub fn list_categories(root: &Path) -> Result<Vec<PathBuf>, CurateError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Supported image files directly inside a category directory,
/// lexicographically sorted so batch order matches capture order.
pub fn list_images(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|s| SUPPORTED_EXTENSIONS.contains(&s.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Decodes a frame as 3-channel color.
pub fn read_frame(path: &Path) -> Result<RgbImage, CurateError> {
    let img = image::open(path).map_err(|source| CurateError::UnreadableImage {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Encodes a frame, creating intermediate directories as needed.
pub fn write_frame(path: &Path, frame: &RgbImage) -> Result<(), CurateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    frame.save(path).map_err(|source| CurateError::WriteImage {
        path: path.to_path_buf(),
        source,
    })
}

/// Export file name for the given per-category index.
pub fn export_name(index: usize) -> String {
    format!("image_{index:05}.png")
}

/// Last path component of a category directory.
pub fn category_name(category: &Path) -> String {
    category
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Output root placed next to the dataset, named after it plus a suffix
/// (e.g. `plants` -> `plants_cropped`). A trailing slash on the dataset
/// path is irrelevant.
pub fn sibling_output_root(dataset: &Path, suffix: &str) -> Result<PathBuf, CurateError> {
    let name = dataset
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("dataset path {} has no usable name", dataset.display()),
            )
        })?;
    Ok(dataset.with_file_name(format!("{name}{suffix}")))
}
